//! Transaction kind and receipt upload outcome

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received, from a client or standalone.
    Incoming,
    /// Money paid out, to a worker or standalone.
    Outgoing,
}

impl TransactionKind {
    /// Parse a form-submitted kind string.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim() {
            "" => Err(ValidationError::Empty { field: "type" }),
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            other => Err(ValidationError::InvalidVariant {
                field: "type",
                value: other.to_owned(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the best-effort receipt image upload.
///
/// Upload runs before the ledger insert and its result is carried into the
/// write as a value. A failed upload still records the transaction, just
/// without an image reference. The inconsistency window between a completed
/// upload and a failed insert (an orphaned object) is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptUpload {
    /// Upload succeeded, public URL to store.
    Uploaded(String),
    /// No image was supplied, or the store is disabled.
    Skipped,
    /// Upload failed; already logged, the write proceeds without an image.
    Failed,
}

impl ReceiptUpload {
    /// The URL to persist, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Uploaded(url) => Some(url),
            Self::Skipped | Self::Failed => None,
        }
    }
}
