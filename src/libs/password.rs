//! Password hashing with bcrypt

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str, cost: u32) -> Result<String, PasswordError> {
        bcrypt::hash(password, cost).map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// A malformed stored hash never authenticates.
    pub fn verify(password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "stored password hash could not be parsed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = PasswordService::hash("admin123", 4).unwrap();
        assert_ne!(hash, "admin123");
        assert!(PasswordService::verify("admin123", &hash));
        assert!(!PasswordService::verify("admin124", &hash));
    }

    #[test]
    fn garbage_hash_is_rejected() {
        assert!(!PasswordService::verify("admin123", "not-a-bcrypt-hash"));
    }
}
