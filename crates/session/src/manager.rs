//! Session lifecycle manager.
//!
//! Orchestrates the full credential lifecycle over an injected store:
//! validation, hashing, token issue/verify, revocation. Centralizes the
//! mapping from store/token/hash errors into the boundary taxonomy.
//!
//! Session state as observed through the stored refresh token:
//! no value = revoked/no session; a value = the single active session.
//! Login overwrites it (superseding any prior session), refresh rotates it,
//! logout clears it.
//!
//! All operations take an explicit `now` so expiry behavior is deterministic
//! under test; transports pass `Utc::now()`.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use quillpress_auth::{
    AccountProfile, AuthConfig, CredentialRecord, PasswordService, Principal, TokenError,
    TokenSigner, normalize_login_key,
};
use quillpress_core::{AccountId, AuthError, AuthResult};
use quillpress_infra::{CredentialStore, CredentialStoreError};

use crate::dto::{LoginRequest, RefreshedTokens, RegisterRequest, SessionTokens};

pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    signer: TokenSigner,
    passwords: PasswordService,
    min_password_len: usize,
}

impl SessionManager {
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            signer: TokenSigner::new(config),
            passwords: PasswordService::new(config),
            min_password_len: config.min_password_len,
        }
    }

    /// Register a new account. The only operation that creates a record.
    pub fn register(&self, req: &RegisterRequest, now: DateTime<Utc>) -> AuthResult<SessionTokens> {
        let login_key = normalize_login_key(&req.login_key);
        if login_key.is_empty() || !login_key.contains('@') {
            return Err(AuthError::validation("invalid login key format"));
        }
        if req.password != req.confirm_password {
            return Err(AuthError::validation("password confirmation does not match"));
        }
        if req.password.len() < self.min_password_len {
            return Err(AuthError::validation(format!(
                "password must be at least {} characters",
                self.min_password_len
            )));
        }

        let password_hash = self
            .passwords
            .hash(&req.password)
            .map_err(|e| AuthError::internal(e.to_string()))?;

        let mut record = CredentialRecord::new(&login_key, password_hash, now);
        let access_token = self.issue_access(&record, now)?;
        let refresh_token = self
            .signer
            .issue_refresh(record.id, now)
            .map_err(map_token_err)?;

        // Persist the session with the record: one write, no second update.
        record.refresh_token = Some(refresh_token.clone());
        let account_id = record.id;
        self.store.insert(record).map_err(map_store_err)?;

        tracing::info!(%account_id, "account registered");
        Ok(SessionTokens {
            account_id,
            access_token,
            refresh_token,
        })
    }

    /// Log in with a login key and password.
    ///
    /// Fails uniformly with `InvalidCredentials` whether the login key is
    /// unknown or the password mismatched. On success the stored refresh
    /// token is overwritten: at most one active session per account.
    pub fn login(&self, req: &LoginRequest, now: DateTime<Utc>) -> AuthResult<SessionTokens> {
        let Some(record) = self
            .store
            .find_by_login_key(&req.login_key)
            .map_err(map_store_err)?
        else {
            // Burn a verification anyway so an unknown login key takes as
            // long as a wrong password.
            self.passwords.verify_dummy(&req.password);
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(&req.password, &record.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.issue_access(&record, now)?;
        let refresh_token = self
            .signer
            .issue_refresh(record.id, now)
            .map_err(map_token_err)?;

        self.store
            .record_login(record.id, &refresh_token, now)
            .map_err(map_store_err)?;

        tracing::info!(account_id = %record.id, "login succeeded");
        Ok(SessionTokens {
            account_id: record.id,
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token and derive the caller view.
    ///
    /// Pure function of the token verifier; never touches storage. Claims
    /// are re-derived per request, never cached across requests.
    pub fn verify_access(&self, access_token: &str, now: DateTime<Utc>) -> AuthResult<Principal> {
        let claims = self
            .signer
            .verify_access(access_token, now)
            .map_err(map_token_err)?;
        Ok(Principal::from(&claims))
    }

    /// Redeem a refresh token for a new token pair, rotating the stored
    /// refresh value.
    ///
    /// Validity is cryptographic *and* stateful: a structurally valid,
    /// unexpired token that no longer equals the stored value is revoked
    /// (logout, or a replay after rotation/re-login) and fails
    /// `Unauthenticated`. Check-then-act here is not transactional; a
    /// concurrent logout resolves by the store's last-write-wins semantics.
    pub fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> AuthResult<RefreshedTokens> {
        let claims = self
            .signer
            .verify_refresh(refresh_token, now)
            .map_err(map_token_err)?;

        let record = self
            .store
            .find_by_id(claims.sub)
            .map_err(map_store_err)?
            .ok_or_else(|| AuthError::unauthenticated("refresh token is not recognized"))?;

        if record.refresh_token.as_deref() != Some(refresh_token) {
            return Err(AuthError::unauthenticated("refresh token has been revoked"));
        }

        // Fresh access claims come from the current record, so role and
        // permission changes land here at the latest.
        let access_token = self.issue_access(&record, now)?;
        let rotated = self
            .signer
            .issue_refresh(record.id, now)
            .map_err(map_token_err)?;
        self.store
            .set_refresh_token(record.id, Some(&rotated))
            .map_err(map_store_err)?;

        tracing::debug!(account_id = %record.id, "refresh token rotated");
        Ok(RefreshedTokens {
            access_token,
            refresh_token: rotated,
        })
    }

    /// Revoke the active session by clearing the stored refresh token.
    ///
    /// Idempotent: logging out an already-revoked session succeeds silently.
    /// An unknown identity is `NotFound`.
    pub fn logout(&self, account_id: AccountId) -> AuthResult<()> {
        self.store
            .set_refresh_token(account_id, None)
            .map_err(map_store_err)?;
        tracing::info!(%account_id, "logged out");
        Ok(())
    }

    /// Verify-access then load the record, returning public fields only.
    pub fn profile(&self, access_token: &str, now: DateTime<Utc>) -> AuthResult<AccountProfile> {
        let principal = self.verify_access(access_token, now)?;
        let record = self
            .store
            .find_by_id(principal.account_id)
            .map_err(map_store_err)?
            .ok_or(AuthError::NotFound)?;
        Ok(record.profile())
    }

    fn issue_access(&self, record: &CredentialRecord, now: DateTime<Utc>) -> AuthResult<String> {
        self.signer
            .issue_access(
                record.id,
                &record.login_key,
                record.role,
                &record.permissions,
                now,
            )
            .map_err(map_token_err)
    }
}

fn map_store_err(err: CredentialStoreError) -> AuthError {
    match err {
        CredentialStoreError::DuplicateLoginKey(_) => {
            AuthError::conflict("login key already registered")
        }
        CredentialStoreError::NotFound => AuthError::NotFound,
        CredentialStoreError::Unavailable(msg) => AuthError::unavailable(msg),
    }
}

fn map_token_err(err: TokenError) -> AuthError {
    match err {
        TokenError::Malformed => AuthError::unauthenticated("token is malformed"),
        TokenError::Expired => AuthError::unauthenticated("token has expired"),
        TokenError::Signing => AuthError::internal("token signing failed"),
    }
}
