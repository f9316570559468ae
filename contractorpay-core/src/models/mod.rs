//! Domain models with validation at construction

pub mod counterparty;
pub mod money;
pub mod role;
pub mod transaction;
pub mod username;
pub mod validation;

pub use counterparty::Counterparty;
pub use money::Amount;
pub use role::Role;
pub use transaction::{ReceiptUpload, TransactionKind};
pub use username::Username;
pub use validation::ValidationError;
