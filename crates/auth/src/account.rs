//! Credential record: the sole source of truth for session validity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quillpress_core::AccountId;

use crate::{PermissionSet, Role};

/// Normalize a login key (email) for lookup and storage.
///
/// Applied at every entry point so two spellings of the same address cannot
/// create two accounts.
pub fn normalize_login_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Stored account record.
///
/// # Invariants
/// - `id` is assigned at creation and immutable.
/// - `login_key` is unique and case-normalized.
/// - `refresh_token` holds at most one live value; `None` means no active
///   session. A structurally valid refresh token that no longer equals this
///   value is revoked, regardless of its cryptographic validity.
/// - `password_hash` and `refresh_token` never leave this crate through
///   [`AccountProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: AccountId,
    pub login_key: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub role: Role,
    pub permissions: PermissionSet,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Create a fresh record at registration. Role defaults to `user` with an
    /// empty permission set; grants happen through the store later.
    pub fn new(login_key: &str, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: AccountId::new(),
            login_key: normalize_login_key(login_key),
            password_hash,
            refresh_token: None,
            role: Role::default(),
            permissions: PermissionSet::new(),
            last_login_at: None,
            created_at: now,
        }
    }

    /// Public projection: everything a caller may see about an account.
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            login_key: self.login_key.clone(),
            role: self.role,
            permissions: self.permissions.clone(),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// Public account fields. Structurally cannot carry the password hash or the
/// stored refresh-token value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: AccountId,
    pub login_key: String,
    pub role: Role,
    pub permissions: PermissionSet,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
