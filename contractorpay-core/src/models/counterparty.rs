//! Transaction counterparty
//!
//! A ledger entry is linked to at most one worker or one client, or neither
//! (a standalone entry). The link is fixed at creation and enforced here
//! rather than by two independently nullable columns.

use serde::Serialize;
use uuid::Uuid;

use super::ValidationError;

/// Who a transaction is with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Counterparty {
    Worker(Uuid),
    Client(Uuid),
    None,
}

impl Counterparty {
    /// Build from the optional form fields.
    ///
    /// Empty strings count as absent, matching HTML form submission of an
    /// unselected dropdown. Supplying both ids is rejected.
    pub fn from_form(worker_id: Option<&str>, client_id: Option<&str>) -> Result<Self, ValidationError> {
        let worker_id = worker_id.map(str::trim).filter(|s| !s.is_empty());
        let client_id = client_id.map(str::trim).filter(|s| !s.is_empty());

        match (worker_id, client_id) {
            (Some(_), Some(_)) => Err(ValidationError::Conflicting {
                first: "workerId",
                second: "clientId",
            }),
            (Some(w), None) => Ok(Self::Worker(parse_id(w, "workerId")?)),
            (None, Some(c)) => Ok(Self::Client(parse_id(c, "clientId")?)),
            (None, None) => Ok(Self::None),
        }
    }

    /// Worker id column value.
    pub fn worker_id(&self) -> Option<Uuid> {
        match self {
            Self::Worker(id) => Some(*id),
            _ => None,
        }
    }

    /// Client id column value.
    pub fn client_id(&self) -> Option<Uuid> {
        match self {
            Self::Client(id) => Some(*id),
            _ => None,
        }
    }

    /// Rebuild from the stored columns. Rows predating the sum-type rule
    /// could in theory carry both ids; the worker link wins in that case.
    pub fn from_columns(worker_id: Option<Uuid>, client_id: Option<Uuid>) -> Self {
        match (worker_id, client_id) {
            (Some(w), _) => Self::Worker(w),
            (None, Some(c)) => Self::Client(c),
            (None, None) => Self::None,
        }
    }
}

fn parse_id(s: &str, field: &'static str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(s).map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "invalid id format",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_when_both_absent() {
        assert_eq!(Counterparty::from_form(None, None).unwrap(), Counterparty::None);
        assert_eq!(Counterparty::from_form(Some(""), Some("  ")).unwrap(), Counterparty::None);
    }

    #[test]
    fn links_one_side() {
        let id = Uuid::new_v4();
        let cp = Counterparty::from_form(Some(&id.to_string()), None).unwrap();
        assert_eq!(cp, Counterparty::Worker(id));
        assert_eq!(cp.worker_id(), Some(id));
        assert_eq!(cp.client_id(), None);
    }

    #[test]
    fn rejects_both_sides() {
        let a = Uuid::new_v4().to_string();
        let b = Uuid::new_v4().to_string();
        let err = Counterparty::from_form(Some(&a), Some(&b)).unwrap_err();
        assert!(matches!(err, ValidationError::Conflicting { .. }));
    }

    #[test]
    fn rejects_malformed_id() {
        let err = Counterparty::from_form(Some("not-a-uuid"), None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "workerId", .. }));
    }
}
