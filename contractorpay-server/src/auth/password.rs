//! Password hashing
//!
//! bcrypt with cost 10. Only the salted hash is ever stored.

use bcrypt::BcryptError;

const COST: u32 = 10;

/// Hash a plaintext password for storage.
pub fn hash(plaintext: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, COST)
}

/// Check a login attempt against the stored hash.
///
/// A malformed stored hash reads as a failed match rather than an error;
/// the caller only ever learns "valid credentials or not".
pub fn verify(plaintext: &str, stored_hash: &str) -> bool {
    bcrypt::verify(plaintext, stored_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        // Lower cost to keep the test quick
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        assert!(verify("s3cret", &hash));
        assert!(!verify("wrong", &hash));
    }

    #[test]
    fn malformed_hash_is_a_failed_match() {
        assert!(!verify("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn hash_is_salted() {
        let a = bcrypt::hash("same", 4).unwrap();
        let b = bcrypt::hash("same", 4).unwrap();
        assert_ne!(a, b);
    }
}
