use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    account_type::AccountType, disability::DisabilityType, status::AccountStatus,
};

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("limit must be between 1 and 100, got {0}")]
    InvalidLimit(u32),
    #[error("invalid order_by field: {0}")]
    InvalidOrderBy(String),
    #[error("sort_order must be 'asc' or 'desc', got {0}")]
    InvalidSortOrder(String),
    #[error("created_after must be before created_before")]
    InvalidDateRange,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    CreatedAt,
    Username,
    LastLoginAt,
    Email,
    UpdatedAt,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::CreatedAt => "created_at",
            OrderBy::Username => "username",
            OrderBy::LastLoginAt => "last_login_at",
            OrderBy::Email => "email",
            OrderBy::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderBy {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(OrderBy::CreatedAt),
            "username" => Ok(OrderBy::Username),
            "last_login_at" => Ok(OrderBy::LastLoginAt),
            "email" => Ok(OrderBy::Email),
            "updated_at" => Ok(OrderBy::UpdatedAt),
            other => Err(FilterError::InvalidOrderBy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(FilterError::InvalidSortOrder(other.to_string())),
        }
    }
}

/// Query filters for listing accounts.
///
/// A `limit` of 0 means "not set" and is replaced by [`DEFAULT_LIMIT`] in
/// [`UserAccountFilter::with_defaults`]. Offsets are unsigned, so they are
/// never negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccountFilter {
    /// Case-insensitive match against username or email
    pub search: Option<String>,
    pub status: Option<AccountStatus>,
    pub account_type: Option<AccountType>,
    pub disability_type: Option<DisabilityType>,
    pub is_verified: Option<bool>,

    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,

    pub limit: u32,
    pub offset: u32,

    pub order_by: Option<OrderBy>,
    pub sort_order: Option<SortOrder>,
}

impl UserAccountFilter {
    pub fn with_defaults(mut self) -> Self {
        if self.limit == 0 {
            self.limit = DEFAULT_LIMIT;
        }
        self.order_by.get_or_insert_default();
        self.sort_order.get_or_insert_default();
        self
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(FilterError::InvalidLimit(self.limit));
        }
        if let (Some(after), Some(before)) = (self.created_after, self.created_before) {
            if after > before {
                return Err(FilterError::InvalidDateRange);
            }
        }
        Ok(())
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by.unwrap_or_default()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }
}
