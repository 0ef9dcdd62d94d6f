use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::user_account::UserAccountError;

/// Classification of an account within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Internal,
    External,
    Membership,
    Partner,
    Developer,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Internal,
        AccountType::External,
        AccountType::Membership,
        AccountType::Partner,
        AccountType::Developer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Internal => "internal",
            AccountType::External => "external",
            AccountType::Membership => "membership",
            AccountType::Partner => "partner",
            AccountType::Developer => "developer",
        }
    }

    /// Only membership accounts may confirm themselves.
    pub fn allows_self_verification(&self) -> bool {
        matches!(self, AccountType::Membership)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = UserAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| UserAccountError::InvalidType(s.to_string()))
    }
}
