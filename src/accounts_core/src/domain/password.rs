use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use crate::ports::services::{HasherError, PasswordHasher};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Unicode general categories P (punctuation) and S (symbol)
static SPECIAL_CHAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{P}\p{S}]").expect("special character pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("password cannot be empty")]
    Empty,
    #[error("password must be at least 8 characters")]
    TooShort,
    #[error("password must contain uppercase, lowercase, number, and special character")]
    TooWeak,
}

/// Checks a raw password against the password policy.
///
/// Runs before hashing, at account creation or password change. The raw value
/// is neither stored nor hashed here.
pub fn validate_password(raw: &str) -> Result<(), PasswordError> {
    if raw.trim().is_empty() {
        return Err(PasswordError::Empty);
    }
    if raw.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in raw.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_numeric() {
            has_digit = true;
        } else if is_punctuation_or_symbol(c) {
            has_special = true;
        }
    }

    if !(has_upper && has_lower && has_digit && has_special) {
        return Err(PasswordError::TooWeak);
    }

    Ok(())
}

fn is_punctuation_or_symbol(c: char) -> bool {
    let mut buf = [0u8; 4];
    SPECIAL_CHAR_PATTERN.is_match(c.encode_utf8(&mut buf))
}

/// Encoded credential produced by a [`PasswordHasher`].
///
/// The value is opaque to the domain: comparisons against raw candidates are
/// delegated to the hasher, and the encoded string never shows up in `Debug`.
#[derive(Clone)]
pub struct PasswordHash(Secret<String>);

impl PasswordHash {
    pub fn new(encoded: Secret<String>) -> Self {
        Self(encoded)
    }

    pub fn is_blank(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }

    pub fn compare<H>(&self, raw: &Secret<String>, hasher: &H) -> Result<bool, HasherError>
    where
        H: PasswordHasher + ?Sized,
    {
        hasher.compare(raw, self)
    }
}

impl AsRef<Secret<String>> for PasswordHash {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

impl From<String> for PasswordHash {
    fn from(encoded: String) -> Self {
        Self(Secret::new(encoded))
    }
}

impl PartialEq for PasswordHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Eq for PasswordHash {}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}
