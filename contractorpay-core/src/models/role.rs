//! User roles

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Account role. The auto-seeded first account is the only admin created
/// by the system itself; every account created through the admin screen
/// defaults to partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Partner,
}

impl Role {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim() {
            "admin" => Ok(Self::Admin),
            "partner" => Ok(Self::Partner),
            other => Err(ValidationError::InvalidVariant {
                field: "role",
                value: other.to_owned(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Partner => "partner",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Partner
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("partner").unwrap(), Role::Partner);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn defaults_to_partner() {
        assert_eq!(Role::default(), Role::Partner);
        assert!(!Role::default().is_admin());
    }

    #[test]
    fn rejects_unknown() {
        assert!(Role::parse("superuser").is_err());
    }
}
