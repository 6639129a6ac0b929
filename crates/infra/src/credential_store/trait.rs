use chrono::{DateTime, Utc};
use thiserror::Error;

use quillpress_auth::{CredentialRecord, PermissionSet, Role};
use quillpress_core::AccountId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    /// Uniqueness violation on the login key.
    #[error("login key already registered: {0}")]
    DuplicateLoginKey(String),

    /// The targeted record does not exist.
    #[error("account not found")]
    NotFound,

    /// Transient failure (connection, lock). Retryable by the caller and
    /// never a security decision.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal interface over account records.
///
/// Each method is a single-record read or read-modify-write; the store's
/// atomicity guarantee for one record update is the only concurrency
/// assumption this core makes. There is no cross-call transaction, so
/// check-then-act sequences above this trait resolve last-write-wins.
pub trait CredentialStore: Send + Sync {
    /// Insert a new record. The login key must be unique.
    fn insert(&self, record: CredentialRecord) -> Result<(), CredentialStoreError>;

    fn find_by_id(&self, id: AccountId) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    /// Lookup by normalized login key.
    fn find_by_login_key(
        &self,
        login_key: &str,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    /// Overwrite the stored refresh-token value. `None` revokes the session.
    fn set_refresh_token(
        &self,
        id: AccountId,
        token: Option<&str>,
    ) -> Result<(), CredentialStoreError>;

    /// Successful-login update: set the refresh token and stamp last-login
    /// as one record write.
    fn record_login(
        &self,
        id: AccountId,
        refresh_token: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError>;

    /// Role changes come from administration outside this core; they affect
    /// tokens issued afterwards, not tokens already in flight.
    fn set_role(&self, id: AccountId, role: Role) -> Result<(), CredentialStoreError>;

    fn set_permissions(
        &self,
        id: AccountId,
        permissions: PermissionSet,
    ) -> Result<(), CredentialStoreError>;
}
