use secrecy::Secret;
use thiserror::Error;

use crate::domain::password::PasswordHash;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HasherError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Port trait for the password hashing capability.
///
/// Implementations are CPU-bound and synchronous; async callers should run
/// them on a blocking thread.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, raw: &Secret<String>) -> Result<PasswordHash, HasherError>;

    /// `Ok(false)` is a mismatch; `Err` means the comparison could not be made.
    fn compare(&self, raw: &Secret<String>, encoded: &PasswordHash) -> Result<bool, HasherError>;
}

/// Port trait for the account identifier generator.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}
