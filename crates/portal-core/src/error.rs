//! Domain and storage errors

use thiserror::Error;

/// Failures of the durable key-value medium. Never fatal to a store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, limit {limit}")]
    QuotaExceeded { key: String, needed: u64, limit: u64 },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Stored value for {key} is corrupt: {message}")]
    Corrupt { key: String, message: String },

    #[error("Failed to serialize value for {key}: {message}")]
    Serialization { key: String, message: String },

    #[error("I/O error on {key}: {message}")]
    Io { key: String, message: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Password too short")]
    PasswordTooShort,

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: &str) -> Self {
        DomainError::NotFound { entity, id: id.to_string() }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<portal_security::PasswordError> for DomainError {
    fn from(err: portal_security::PasswordError) -> Self {
        use portal_security::PasswordError;
        match err {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::HashError(e) => DomainError::PasswordHashError(e),
        }
    }
}
