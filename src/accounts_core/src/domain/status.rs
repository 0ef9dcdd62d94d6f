use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{disability::DisabilityType, user_account::UserAccountError};

/// Coarse lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    PendingVerification,
    Active,
    Disabled,
    Deleted,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 4] = [
        AccountStatus::PendingVerification,
        AccountStatus::Active,
        AccountStatus::Disabled,
        AccountStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::PendingVerification => "pending_verification",
            AccountStatus::Active => "active",
            AccountStatus::Disabled => "disabled",
            AccountStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = UserAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| UserAccountError::InvalidStatus(s.to_string()))
    }
}

/// Full lifecycle state.
///
/// The disability type and the reason it was issued only exist inside the
/// `Disabled` variant, so an account carries them exactly while disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccountState {
    PendingVerification,
    Active,
    Disabled {
        disability_type: DisabilityType,
        issued_reason: String,
    },
    Deleted,
}

impl AccountState {
    pub fn status(&self) -> AccountStatus {
        match self {
            AccountState::PendingVerification => AccountStatus::PendingVerification,
            AccountState::Active => AccountStatus::Active,
            AccountState::Disabled { .. } => AccountStatus::Disabled,
            AccountState::Deleted => AccountStatus::Deleted,
        }
    }

    pub fn disability_type(&self) -> Option<DisabilityType> {
        match self {
            AccountState::Disabled {
                disability_type, ..
            } => Some(*disability_type),
            _ => None,
        }
    }

    pub fn issued_reason(&self) -> Option<&str> {
        match self {
            AccountState::Disabled { issued_reason, .. } => Some(issued_reason),
            _ => None,
        }
    }
}
