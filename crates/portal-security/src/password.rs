//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use portal_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password too short")]
    TooShort,
    #[error("Password too long")]
    TooLong,
}

pub struct PasswordService;

impl PasswordService {
    /// Salted PHC string, safe to persist.
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Length policy applied at registration. Seeded demo accounts bypass it.
    pub fn check_policy(password: &str) -> Result<(), PasswordError> {
        let len = password.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("student123").unwrap();
        assert_ne!(hash, "student123");
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("student123", &hash).unwrap());
        assert!(!PasswordService::verify("student124", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = PasswordService::hash("lecturer123").unwrap();
        let b = PasswordService::hash("lecturer123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(PasswordService::verify("x", "plaintext").is_err());
    }

    #[test]
    fn test_policy() {
        assert!(matches!(PasswordService::check_policy("short"), Err(PasswordError::TooShort)));
        assert!(PasswordService::check_policy("long enough").is_ok());
        let huge = "x".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(PasswordService::check_policy(&huge), Err(PasswordError::TooLong)));
    }
}
