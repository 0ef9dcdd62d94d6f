use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern must compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must be at least 3 characters")]
    TooShort,
    #[error("username cannot exceed 30 characters")]
    TooLong,
    #[error("username can only contain letters, numbers, and underscore")]
    InvalidChars,
}

/// Trimmed login name restricted to ASCII letters, digits and underscore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let value = raw.trim();
        let length = value.chars().count();

        if length < MIN_USERNAME_LENGTH {
            return Err(UsernameError::TooShort);
        }
        if length > MAX_USERNAME_LENGTH {
            return Err(UsernameError::TooLong);
        }
        if !USERNAME_PATTERN.is_match(value) {
            return Err(UsernameError::InvalidChars);
        }

        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
