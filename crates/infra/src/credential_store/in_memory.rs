use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use quillpress_auth::{CredentialRecord, PermissionSet, Role, normalize_login_key};
use quillpress_core::AccountId;

use super::r#trait::{CredentialStore, CredentialStoreError};

/// In-memory credential store.
///
/// Intended for tests/dev. Record updates are atomic under the write lock;
/// uniqueness of the login key is enforced through a secondary index.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<AccountId, CredentialRecord>,
    by_login_key: HashMap<String, AccountId>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_record<T>(
        &self,
        id: AccountId,
        f: impl FnOnce(&mut CredentialRecord) -> T,
    ) -> Result<T, CredentialStoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(CredentialStoreError::NotFound)?;
        Ok(f(record))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn insert(&self, record: CredentialRecord) -> Result<(), CredentialStoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;

        let key = normalize_login_key(&record.login_key);
        if inner.by_login_key.contains_key(&key) {
            return Err(CredentialStoreError::DuplicateLoginKey(key));
        }

        inner.by_login_key.insert(key, record.id);
        inner.records.insert(record.id, record);
        Ok(())
    }

    fn find_by_id(&self, id: AccountId) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(inner.records.get(&id).cloned())
    }

    fn find_by_login_key(
        &self,
        login_key: &str,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        let key = normalize_login_key(login_key);
        Ok(inner
            .by_login_key
            .get(&key)
            .and_then(|id| inner.records.get(id))
            .cloned())
    }

    fn set_refresh_token(
        &self,
        id: AccountId,
        token: Option<&str>,
    ) -> Result<(), CredentialStoreError> {
        self.with_record(id, |record| {
            record.refresh_token = token.map(str::to_string);
        })
    }

    fn record_login(
        &self,
        id: AccountId,
        refresh_token: &str,
        at: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError> {
        self.with_record(id, |record| {
            record.refresh_token = Some(refresh_token.to_string());
            record.last_login_at = Some(at);
        })
    }

    fn set_role(&self, id: AccountId, role: Role) -> Result<(), CredentialStoreError> {
        self.with_record(id, |record| {
            record.role = role;
        })
    }

    fn set_permissions(
        &self,
        id: AccountId,
        permissions: PermissionSet,
    ) -> Result<(), CredentialStoreError> {
        self.with_record(id, |record| {
            record.permissions = permissions;
        })
    }
}
