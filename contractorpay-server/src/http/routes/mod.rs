//! Route handlers organized by resource

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod transactions;
pub mod users;
pub mod workers;
