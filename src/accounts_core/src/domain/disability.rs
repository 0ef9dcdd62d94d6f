use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::user_account::UserAccountError;

/// Reason taxonomy refining the `Disabled` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisabilityType {
    Inactive,
    Suspended,
    Blocked,
    Manual,
    Expired,
    Violation,
}

impl DisabilityType {
    pub const ALL: [DisabilityType; 6] = [
        DisabilityType::Inactive,
        DisabilityType::Suspended,
        DisabilityType::Blocked,
        DisabilityType::Manual,
        DisabilityType::Expired,
        DisabilityType::Violation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisabilityType::Inactive => "inactive",
            DisabilityType::Suspended => "suspended",
            DisabilityType::Blocked => "blocked",
            DisabilityType::Manual => "manual",
            DisabilityType::Expired => "expired",
            DisabilityType::Violation => "violation",
        }
    }
}

impl fmt::Display for DisabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisabilityType {
    type Err = UserAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisabilityType::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| UserAccountError::InvalidDisabilityType(s.to_string()))
    }
}
