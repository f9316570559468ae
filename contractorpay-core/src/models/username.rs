//! Username validation
//!
//! Usernames are short slugs: lowercase alphanumeric with hyphens,
//! underscores, and dots, starting with an alphanumeric character.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 32;

/// Matches the DB expectation: ^[a-z0-9][a-z0-9._-]{0,31}$
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]{0,31}$").expect("invalid username regex"));

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }

        if s.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must be lowercase alphanumeric with dots, hyphens, or underscores",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("admin").is_ok());
        assert!(Username::new("jane.doe").is_ok());
        assert!(Username::new("partner_2").is_ok());
        assert!(Username::new("  admin  ").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Username::new("").unwrap_err(),
            ValidationError::Empty { field: "username" }
        ));
    }

    #[test]
    fn rejects_uppercase_and_spaces() {
        assert!(Username::new("Admin").is_err());
        assert!(Username::new("jane doe").is_err());
    }

    #[test]
    fn rejects_leading_punctuation() {
        assert!(Username::new(".admin").is_err());
    }

    #[test]
    fn max_length() {
        let ok = "a".repeat(32);
        assert!(Username::new(&ok).is_ok());

        let too_long = "a".repeat(33);
        assert!(matches!(
            Username::new(&too_long).unwrap_err(),
            ValidationError::TooLong { max: 32, .. }
        ));
    }
}
