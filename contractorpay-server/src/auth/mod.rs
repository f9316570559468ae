//! Session gate and credential handling
//!
//! A single signed cookie is the only authentication signal. Its payload
//! carries the user id, username, and role; decode success plus an
//! unexpired timestamp means authenticated. Role checks happen in the
//! capability gate before any admin action touches data.

pub mod gate;
pub mod password;
pub mod session;

pub use gate::{Capability, Decision};
pub use session::{Session, SessionSigner, SESSION_COOKIE};
