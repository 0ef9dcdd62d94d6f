use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use secrecy::Secret;
use serde::Serialize;
use thiserror::Error;

use super::{
    account_type::AccountType,
    disability::DisabilityType,
    email::{Email, EmailError},
    lockout::LockoutPolicy,
    password::PasswordHash,
    status::{AccountState, AccountStatus},
    username::{Username, UsernameError},
};

/// `registered_by` / `verified_by` value for actions the account holder performed.
pub const SELF_REGISTRATION: &str = "self";
/// `registered_by` value for accounts provisioned by automation.
pub const SYSTEM_REGISTRATION: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserAccountError {
    // Format
    #[error(transparent)]
    Username(#[from] UsernameError),
    #[error(transparent)]
    Email(#[from] EmailError),

    // Preconditions
    #[error("ID cannot be empty")]
    EmptyId,
    #[error("password hash cannot be empty")]
    EmptyPasswordHash,
    #[error("registeredBy cannot be empty")]
    EmptyRegisteredBy,
    #[error("actor ID cannot be empty")]
    EmptyActor,
    #[error("reason cannot be empty")]
    EmptyReason,
    #[error("IP address cannot be empty")]
    EmptyIp,
    #[error("max attempts must be greater than 0")]
    InvalidMaxAttempts,
    #[error("lock duration must be greater than 0")]
    InvalidLockDuration,

    // State
    #[error("user account is not pending verification")]
    NotPending,
    #[error("user account is already verified")]
    AlreadyVerified,
    #[error("self-verification only allowed for membership accounts")]
    NotAllowedForType,
    #[error("user account is not disabled")]
    NotDisabled,
    #[error("cannot disable deleted account")]
    CannotDisableDeleted,
    #[error("cannot disable unverified account")]
    CannotDisableUnverified,
    #[error("user account is already disabled with the same type")]
    AlreadySameDisability,
    #[error("user account is already deleted")]
    AlreadyDeleted,

    // Redundancy
    #[error("new value is the same as the current value")]
    NoChange,

    // Domain enums parsed from text
    #[error("invalid account type: {0}")]
    InvalidType(String),
    #[error("invalid disability type: {0}")]
    InvalidDisabilityType(String),
    #[error("invalid account status: {0}")]
    InvalidStatus(String),
}

/// The account aggregate root.
///
/// Every mutator validates all of its preconditions before touching a field,
/// so a returned error always leaves the account exactly as it was. Each call
/// reads the clock once and reuses that instant for every timestamp it writes.
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    id: String,
    username: Username,
    email: Email,
    #[serde(skip)]
    password_hash: PasswordHash,

    #[serde(flatten)]
    state: AccountState,
    account_type: AccountType,
    registered_by: String,

    is_verified: bool,
    verified_by: Option<String>,
    verified_at: Option<DateTime<Utc>>,
    last_action_by: Option<String>,

    last_login_at: Option<DateTime<Utc>>,
    last_login_ip: Option<String>,
    failed_login_attempts: u32,
    last_failed_login_attempt: Option<DateTime<Utc>>,
    last_failed_login_ip: Option<String>,
    locked_until: Option<DateTime<Utc>>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<String>,
}

fn required(value: &str, error: UserAccountError) -> Result<String, UserAccountError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(value.to_owned())
    }
}

impl UserAccount {
    /// Builds a new account in `PendingVerification` from an already hashed password.
    ///
    /// # Arguments
    /// * `id` - Externally generated identifier
    /// * `username` - Raw username, validated and trimmed
    /// * `email` - Raw email, validated and normalized
    /// * `password_hash` - Output of a `PasswordHasher`
    /// * `account_type` - Account classification
    /// * `registered_by` - Actor id, `"self"` or a system identifier
    pub fn new_with_hash(
        id: &str,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
        account_type: AccountType,
        registered_by: &str,
    ) -> Result<Self, UserAccountError> {
        let id = required(id, UserAccountError::EmptyId)?;
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;
        if password_hash.is_blank() {
            return Err(UserAccountError::EmptyPasswordHash);
        }
        let registered_by = required(registered_by, UserAccountError::EmptyRegisteredBy)?;

        let now = Utc::now();
        Ok(Self {
            id,
            username,
            email,
            password_hash,
            state: AccountState::PendingVerification,
            account_type,
            registered_by,
            is_verified: false,
            verified_by: None,
            verified_at: None,
            last_action_by: None,
            last_login_at: None,
            last_login_ip: None,
            failed_login_attempts: 0,
            last_failed_login_attempt: None,
            last_failed_login_ip: None,
            locked_until: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        })
    }

    /// Self-service sign-up: a `Membership` account registered by `"self"`.
    pub fn new_self_registered(
        id: &str,
        username: &str,
        email: &str,
        password_hash: PasswordHash,
    ) -> Result<Self, UserAccountError> {
        Self::new_with_hash(
            id,
            username,
            email,
            password_hash,
            AccountType::Membership,
            SELF_REGISTRATION,
        )
    }

    // ------------------------------------------------------------------
    // Verification
    // ------------------------------------------------------------------

    pub fn verify(&mut self, verifier_id: &str) -> Result<(), UserAccountError> {
        self.ensure_verifiable()?;
        let verifier = required(verifier_id, UserAccountError::EmptyActor)?;

        self.mark_verified(verifier);
        Ok(())
    }

    /// Email-style confirmation by the account holder; membership accounts only.
    pub fn self_verify(&mut self) -> Result<(), UserAccountError> {
        self.ensure_verifiable()?;
        if !self.account_type.allows_self_verification() {
            return Err(UserAccountError::NotAllowedForType);
        }

        self.mark_verified(SELF_REGISTRATION.to_owned());
        Ok(())
    }

    fn ensure_verifiable(&self) -> Result<(), UserAccountError> {
        if self.is_verified {
            return Err(UserAccountError::AlreadyVerified);
        }
        if self.state != AccountState::PendingVerification {
            return Err(UserAccountError::NotPending);
        }
        Ok(())
    }

    fn mark_verified(&mut self, verifier: String) {
        let now = self.tick();
        self.is_verified = true;
        self.verified_by = Some(verifier.clone());
        self.verified_at = Some(now);
        self.state = AccountState::Active;
        self.last_action_by = Some(verifier);
        self.updated_at = now;
    }

    // ------------------------------------------------------------------
    // Disabling and reactivation
    // ------------------------------------------------------------------

    pub fn activate(&mut self, actor_id: &str) -> Result<(), UserAccountError> {
        self.restore_active(actor_id)
    }

    pub fn reactivate(&mut self, actor_id: &str) -> Result<(), UserAccountError> {
        self.restore_active(actor_id)
    }

    fn restore_active(&mut self, actor_id: &str) -> Result<(), UserAccountError> {
        if !self.is_disabled() {
            return Err(UserAccountError::NotDisabled);
        }
        let actor = required(actor_id, UserAccountError::EmptyActor)?;

        self.state = AccountState::Active;
        self.last_action_by = Some(actor);
        self.updated_at = self.tick();
        Ok(())
    }

    /// Moves an active or already disabled account to `Disabled` with the given type.
    ///
    /// Switching an already disabled account to a different disability type is
    /// allowed; re-applying the same type is not.
    pub fn disable(
        &mut self,
        actor_id: &str,
        disability_type: DisabilityType,
        reason: &str,
    ) -> Result<(), UserAccountError> {
        match &self.state {
            AccountState::Deleted => return Err(UserAccountError::CannotDisableDeleted),
            AccountState::PendingVerification => {
                return Err(UserAccountError::CannotDisableUnverified);
            }
            AccountState::Disabled {
                disability_type: current,
                ..
            } if *current == disability_type => {
                return Err(UserAccountError::AlreadySameDisability);
            }
            AccountState::Active | AccountState::Disabled { .. } => {}
        }
        let actor = required(actor_id, UserAccountError::EmptyActor)?;
        let issued_reason = required(reason, UserAccountError::EmptyReason)?;

        self.state = AccountState::Disabled {
            disability_type,
            issued_reason,
        };
        self.last_action_by = Some(actor);
        self.updated_at = self.tick();
        Ok(())
    }

    pub fn set_inactive(&mut self, actor_id: &str, reason: &str) -> Result<(), UserAccountError> {
        self.disable(actor_id, DisabilityType::Inactive, reason)
    }

    pub fn suspend(&mut self, actor_id: &str, reason: &str) -> Result<(), UserAccountError> {
        self.disable(actor_id, DisabilityType::Suspended, reason)
    }

    pub fn block(&mut self, actor_id: &str, reason: &str) -> Result<(), UserAccountError> {
        self.disable(actor_id, DisabilityType::Blocked, reason)
    }

    pub fn set_expired(&mut self, actor_id: &str, reason: &str) -> Result<(), UserAccountError> {
        self.disable(actor_id, DisabilityType::Expired, reason)
    }

    pub fn set_violation(&mut self, actor_id: &str, reason: &str) -> Result<(), UserAccountError> {
        self.disable(actor_id, DisabilityType::Violation, reason)
    }

    pub fn disable_manually(
        &mut self,
        actor_id: &str,
        reason: &str,
    ) -> Result<(), UserAccountError> {
        self.disable(actor_id, DisabilityType::Manual, reason)
    }

    // ------------------------------------------------------------------
    // Soft deletion
    // ------------------------------------------------------------------

    pub fn delete(&mut self, actor_id: &str) -> Result<(), UserAccountError> {
        if self.is_soft_deleted() {
            return Err(UserAccountError::AlreadyDeleted);
        }
        let actor = required(actor_id, UserAccountError::EmptyActor)?;

        let now = self.tick();
        self.state = AccountState::Deleted;
        self.deleted_at = Some(now);
        self.deleted_by = Some(actor.clone());
        self.last_action_by = Some(actor);
        self.updated_at = now;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Updates
    // ------------------------------------------------------------------

    pub fn update_username(&mut self, new_username: &str) -> Result<(), UserAccountError> {
        let username = Username::parse(new_username)?;
        if username == self.username {
            return Err(UserAccountError::NoChange);
        }

        self.username = username;
        self.updated_at = self.tick();
        Ok(())
    }

    pub fn update_email(&mut self, new_email: &str) -> Result<(), UserAccountError> {
        let email = Email::parse(new_email)?;
        if email == self.email {
            return Err(UserAccountError::NoChange);
        }

        self.email = email;
        self.updated_at = self.tick();
        Ok(())
    }

    pub fn update_password_hash(&mut self, encoded: Secret<String>) -> Result<(), UserAccountError> {
        let password_hash = PasswordHash::new(encoded);
        if password_hash.is_blank() {
            return Err(UserAccountError::EmptyPasswordHash);
        }
        if password_hash == self.password_hash {
            return Err(UserAccountError::NoChange);
        }

        self.password_hash = password_hash;
        self.updated_at = self.tick();
        Ok(())
    }

    pub fn update_type(&mut self, new_type: AccountType) -> Result<(), UserAccountError> {
        if new_type == self.account_type {
            return Err(UserAccountError::NoChange);
        }

        self.account_type = new_type;
        self.updated_at = self.tick();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Login tracking
    // ------------------------------------------------------------------

    pub fn record_successful_login(&mut self, ip_address: &str) -> Result<(), UserAccountError> {
        let ip = required(ip_address, UserAccountError::EmptyIp)?;

        let now = self.tick();
        self.last_login_at = Some(now);
        self.last_login_ip = Some(ip);
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.updated_at = now;
        Ok(())
    }

    /// Counts a failed login and locks the account once `max_attempts` is reached.
    ///
    /// Further failures while locked push `locked_until` forward from the
    /// latest attempt.
    pub fn record_failed_login(
        &mut self,
        ip_address: &str,
        max_attempts: u32,
        lock_duration: Duration,
    ) -> Result<(), UserAccountError> {
        let ip = required(ip_address, UserAccountError::EmptyIp)?;
        if max_attempts == 0 {
            return Err(UserAccountError::InvalidMaxAttempts);
        }
        if lock_duration.is_zero() {
            return Err(UserAccountError::InvalidLockDuration);
        }
        let lock_duration =
            TimeDelta::from_std(lock_duration).map_err(|_| UserAccountError::InvalidLockDuration)?;

        let now = self.tick();
        let attempts = self.failed_login_attempts.saturating_add(1);
        let locked_until = if attempts >= max_attempts {
            let until = now
                .checked_add_signed(lock_duration)
                .ok_or(UserAccountError::InvalidLockDuration)?;
            Some(until)
        } else {
            self.locked_until
        };

        self.failed_login_attempts = attempts;
        self.last_failed_login_attempt = Some(now);
        self.last_failed_login_ip = Some(ip);
        self.locked_until = locked_until;
        self.updated_at = now;
        Ok(())
    }

    pub fn record_failed_login_with(
        &mut self,
        ip_address: &str,
        policy: &LockoutPolicy,
    ) -> Result<(), UserAccountError> {
        self.record_failed_login(ip_address, policy.max_attempts(), policy.lock_duration())
    }

    pub fn unlock_account(&mut self) {
        self.failed_login_attempts = 0;
        self.locked_until = None;
        self.updated_at = self.tick();
    }

    /// Current instant, strictly after the last recorded update so that
    /// `updated_at` can serve as a version for optimistic concurrency.
    fn tick(&self) -> DateTime<Utc> {
        let now = Utc::now();
        if now > self.updated_at {
            return now;
        }
        self.updated_at
            .checked_add_signed(TimeDelta::microseconds(1))
            .unwrap_or(self.updated_at)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn can_login(&self) -> bool {
        self.can_login_at(Utc::now())
    }

    pub fn can_login_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.is_verified && !self.is_locked_at(now)
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked_at(Utc::now())
    }

    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    pub fn is_active(&self) -> bool {
        self.state == AccountState::Active
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.state, AccountState::Disabled { .. })
    }

    pub fn is_soft_deleted(&self) -> bool {
        self.state == AccountState::Deleted
    }

    pub fn is_pending_verification(&self) -> bool {
        self.state == AccountState::PendingVerification
    }

    fn has_disability(&self, kind: DisabilityType) -> bool {
        self.state.disability_type() == Some(kind)
    }

    pub fn is_inactive(&self) -> bool {
        self.has_disability(DisabilityType::Inactive)
    }

    pub fn is_suspended(&self) -> bool {
        self.has_disability(DisabilityType::Suspended)
    }

    pub fn is_blocked(&self) -> bool {
        self.has_disability(DisabilityType::Blocked)
    }

    pub fn is_expired(&self) -> bool {
        self.has_disability(DisabilityType::Expired)
    }

    pub fn has_violation(&self) -> bool {
        self.has_disability(DisabilityType::Violation)
    }

    pub fn is_manually_disabled(&self) -> bool {
        self.has_disability(DisabilityType::Manual)
    }

    pub fn is_internal(&self) -> bool {
        self.account_type == AccountType::Internal
    }

    pub fn is_external(&self) -> bool {
        self.account_type == AccountType::External
    }

    pub fn is_membership(&self) -> bool {
        self.account_type == AccountType::Membership
    }

    pub fn is_partner(&self) -> bool {
        self.account_type == AccountType::Partner
    }

    pub fn is_developer(&self) -> bool {
        self.account_type == AccountType::Developer
    }

    pub fn is_self_registered(&self) -> bool {
        self.registered_by == SELF_REGISTRATION
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn state(&self) -> &AccountState {
        &self.state
    }

    pub fn status(&self) -> AccountStatus {
        self.state.status()
    }

    pub fn disability_type(&self) -> Option<DisabilityType> {
        self.state.disability_type()
    }

    /// Reason recorded by the last `disable`, while the account stays disabled.
    pub fn disability_reason(&self) -> Option<&str> {
        self.state.issued_reason()
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    pub fn registered_by(&self) -> &str {
        &self.registered_by
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn verified_by(&self) -> Option<&str> {
        self.verified_by.as_deref()
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    pub fn last_action_by(&self) -> Option<&str> {
        self.last_action_by.as_deref()
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn last_login_ip(&self) -> Option<&str> {
        self.last_login_ip.as_deref()
    }

    pub fn failed_login_attempts(&self) -> u32 {
        self.failed_login_attempts
    }

    pub fn last_failed_login_attempt(&self) -> Option<DateTime<Utc>> {
        self.last_failed_login_attempt
    }

    pub fn last_failed_login_ip(&self) -> Option<&str> {
        self.last_failed_login_ip.as_deref()
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn deleted_by(&self) -> Option<&str> {
        self.deleted_by.as_deref()
    }
}
