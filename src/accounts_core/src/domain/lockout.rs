use std::time::Duration;

use super::user_account::UserAccountError;

/// How many consecutive failed logins lock an account, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_attempts: u32,
    lock_duration: Duration,
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, lock_duration: Duration) -> Result<Self, UserAccountError> {
        if max_attempts == 0 {
            return Err(UserAccountError::InvalidMaxAttempts);
        }
        if lock_duration.is_zero() {
            return Err(UserAccountError::InvalidLockDuration);
        }
        Ok(Self {
            max_attempts,
            lock_duration,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn lock_duration(&self) -> Duration {
        self.lock_duration
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lock_duration: Duration::from_secs(15 * 60),
        }
    }
}
