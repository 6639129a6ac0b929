//! Black-box tests for the session lifecycle: the flows a route handler
//! layer would drive, exercised over the in-memory credential store with an
//! explicit test clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use quillpress_auth::{AuthConfig, PermissionSet, Role};
use quillpress_core::{AccountId, AuthError, ErrorKind};
use quillpress_infra::{CredentialStore, CredentialStoreError, InMemoryCredentialStore};
use quillpress_session::{LoginRequest, RegisterRequest, SessionManager};

fn test_config() -> AuthConfig {
    AuthConfig {
        // Keep hashing cheap in tests; cost-compatibility has its own test
        // in the password module.
        hash_time_cost: 1,
        ..AuthConfig::default()
    }
}

fn setup() -> (SessionManager, Arc<InMemoryCredentialStore>, DateTime<Utc>) {
    quillpress_observability::init();
    let store = Arc::new(InMemoryCredentialStore::new());
    let manager = SessionManager::new(&test_config(), store.clone());
    (manager, store, Utc::now())
}

fn register(manager: &SessionManager, login_key: &str, now: DateTime<Utc>) -> quillpress_session::SessionTokens {
    manager
        .register(
            &RegisterRequest {
                login_key: login_key.to_string(),
                password: "Secret1!".to_string(),
                confirm_password: "Secret1!".to_string(),
            },
            now,
        )
        .expect("registration should succeed")
}

fn login(manager: &SessionManager, login_key: &str, password: &str, now: DateTime<Utc>) -> Result<quillpress_session::SessionTokens, AuthError> {
    manager.login(
        &LoginRequest {
            login_key: login_key.to_string(),
            password: password.to_string(),
        },
        now,
    )
}

#[test]
fn register_then_login_issues_a_distinct_access_token() {
    let (manager, _store, now) = setup();

    let registered = register(&manager, "a@x.com", now);
    let logged_in = login(&manager, "a@x.com", "Secret1!", now + Duration::seconds(1)).unwrap();

    assert_eq!(logged_in.account_id, registered.account_id);
    assert_ne!(logged_in.access_token, registered.access_token);

    let principal = manager
        .verify_access(&logged_in.access_token, now + Duration::seconds(2))
        .unwrap();
    assert_eq!(principal.account_id, registered.account_id);
    assert_eq!(principal.role, Role::User);
}

#[test]
fn access_token_verifies_until_expiry_then_fails() {
    let (manager, _store, now) = setup();
    let config = test_config();

    let tokens = register(&manager, "a@x.com", now);

    let just_before = now + config.access_token_ttl - Duration::seconds(1);
    assert!(manager.verify_access(&tokens.access_token, just_before).is_ok());

    let at_expiry = now + config.access_token_ttl;
    let err = manager.verify_access(&tokens.access_token, at_expiry).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert_eq!(err.to_string(), "unauthenticated: token has expired");
}

#[test]
fn garbage_access_token_is_unauthenticated() {
    let (manager, _store, now) = setup();
    register(&manager, "a@x.com", now);

    for garbage in ["", "not.a.token", "aaaa.bbbb.cccc"] {
        let err = manager.verify_access(garbage, now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }
}

#[test]
fn login_failure_is_uniform_for_unknown_key_and_wrong_password() {
    let (manager, _store, now) = setup();
    register(&manager, "a@x.com", now);

    let unknown = login(&manager, "nobody@x.com", "Secret1!", now).unwrap_err();
    let wrong = login(&manager, "a@x.com", "wrong-password", now).unwrap_err();

    // Same variant, same message: no account enumeration.
    assert_eq!(unknown, AuthError::InvalidCredentials);
    assert_eq!(wrong, AuthError::InvalidCredentials);
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[test]
fn logout_revokes_the_refresh_token() {
    let (manager, _store, now) = setup();

    let tokens = register(&manager, "a@x.com", now);
    manager.logout(tokens.account_id).unwrap();

    // Structurally valid and unexpired, but no longer matches storage.
    let err = manager
        .refresh(&tokens.refresh_token, now + Duration::seconds(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
}

#[test]
fn logout_is_idempotent() {
    let (manager, _store, now) = setup();
    let tokens = register(&manager, "a@x.com", now);

    manager.logout(tokens.account_id).unwrap();
    manager.logout(tokens.account_id).unwrap();
}

#[test]
fn second_login_supersedes_the_first_session() {
    let (manager, _store, now) = setup();

    register(&manager, "a@x.com", now);
    let first = login(&manager, "a@x.com", "Secret1!", now + Duration::seconds(1)).unwrap();
    let second = login(&manager, "a@x.com", "Secret1!", now + Duration::seconds(2)).unwrap();

    // At most one active refresh token per account.
    let err = manager
        .refresh(&first.refresh_token, now + Duration::seconds(3))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    assert!(manager.refresh(&second.refresh_token, now + Duration::seconds(3)).is_ok());
}

#[test]
fn login_in_the_same_second_as_registration_still_supersedes() {
    let (manager, _store, now) = setup();

    // Same `now` throughout: claims share iat/exp, yet the tokens differ
    // and the newest one is the only redeemable session.
    let registered = register(&manager, "a@x.com", now);
    let logged_in = login(&manager, "a@x.com", "Secret1!", now).unwrap();
    assert_ne!(logged_in.refresh_token, registered.refresh_token);
    assert_ne!(logged_in.access_token, registered.access_token);

    let err = manager.refresh(&registered.refresh_token, now).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert!(manager.refresh(&logged_in.refresh_token, now).is_ok());
}

#[test]
fn rotation_within_the_same_second_revokes_the_presented_token() {
    let (manager, _store, now) = setup();

    let tokens = register(&manager, "a@x.com", now);
    let rotated = manager.refresh(&tokens.refresh_token, now).unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);

    let replay = manager.refresh(&tokens.refresh_token, now).unwrap_err();
    assert_eq!(replay.kind(), ErrorKind::Unauthenticated);
    assert!(manager.refresh(&rotated.refresh_token, now).is_ok());
}

#[test]
fn refresh_rotates_and_the_old_token_cannot_be_replayed() {
    let (manager, _store, now) = setup();

    let tokens = register(&manager, "a@x.com", now);
    let refreshed = manager
        .refresh(&tokens.refresh_token, now + Duration::seconds(1))
        .unwrap();
    assert_ne!(refreshed.refresh_token, tokens.refresh_token);

    // Replaying the superseded token fails; the rotated one redeems.
    let replay = manager
        .refresh(&tokens.refresh_token, now + Duration::seconds(2))
        .unwrap_err();
    assert_eq!(replay.kind(), ErrorKind::Unauthenticated);
    assert!(manager.refresh(&refreshed.refresh_token, now + Duration::seconds(2)).is_ok());
}

#[test]
fn role_change_applies_to_new_tokens_not_in_flight_ones() {
    let (manager, store, now) = setup();

    let tokens = register(&manager, "a@x.com", now);
    store.set_role(tokens.account_id, Role::Admin).unwrap();

    // The in-flight access token keeps its old privilege until it expires:
    // an accepted trade-off of stateless access verification.
    let stale = manager.verify_access(&tokens.access_token, now + Duration::seconds(1)).unwrap();
    assert_eq!(stale.role, Role::User);

    // A refreshed access token picks up the current record.
    let refreshed = manager.refresh(&tokens.refresh_token, now + Duration::seconds(2)).unwrap();
    let fresh = manager
        .verify_access(&refreshed.access_token, now + Duration::seconds(3))
        .unwrap();
    assert_eq!(fresh.role, Role::Admin);
}

#[test]
fn permission_grants_ride_newly_issued_tokens() {
    let (manager, store, now) = setup();

    let tokens = register(&manager, "a@x.com", now);
    let grants: PermissionSet = [quillpress_auth::Permission::new("newsletter.send")]
        .into_iter()
        .collect();
    store.set_permissions(tokens.account_id, grants).unwrap();

    let relogin = login(&manager, "a@x.com", "Secret1!", now + Duration::seconds(1)).unwrap();
    let principal = manager
        .verify_access(&relogin.access_token, now + Duration::seconds(2))
        .unwrap();
    assert!(principal.permissions.contains(&quillpress_auth::Permission::new("newsletter.send")));
}

#[test]
fn profile_returns_public_fields_only() {
    let (manager, _store, now) = setup();

    register(&manager, "a@x.com", now);
    let logged_in = login(&manager, "a@x.com", "Secret1!", now + Duration::seconds(1)).unwrap();

    let profile = manager
        .profile(&logged_in.access_token, now + Duration::seconds(2))
        .unwrap();
    assert_eq!(profile.id, logged_in.account_id);
    assert_eq!(profile.login_key, "a@x.com");
    assert_eq!(profile.role, Role::User);
    assert_eq!(profile.last_login_at, Some(now + Duration::seconds(1)));

    // Serialized shape carries neither hash nor refresh token.
    let json = serde_json::to_value(&profile).unwrap();
    assert!(json.get("password_hash").is_none());
    assert!(json.get("refresh_token").is_none());
}

#[test]
fn lifecycle_scenario_end_to_end() {
    let (manager, _store, now) = setup();

    // register(a@x.com, Secret1!, Secret1!) -> success, identity issued.
    let registered = register(&manager, "a@x.com", now);
    let r1 = registered.refresh_token.clone();

    // login with the wrong password -> InvalidCredentials.
    let err = login(&manager, "a@x.com", "wrong", now + Duration::seconds(1)).unwrap_err();
    assert_eq!(err, AuthError::InvalidCredentials);

    // login with the right password -> success, new refresh token R2.
    let logged_in = login(&manager, "a@x.com", "Secret1!", now + Duration::seconds(2)).unwrap();
    let r2 = logged_in.refresh_token.clone();
    assert_ne!(r1, r2);

    // refresh(R2) -> success with a new access token.
    let refreshed = manager.refresh(&r2, now + Duration::seconds(3)).unwrap();
    assert!(
        manager
            .verify_access(&refreshed.access_token, now + Duration::seconds(4))
            .is_ok()
    );

    // refresh(R1, from registration) -> Unauthenticated.
    let err = manager.refresh(&r1, now + Duration::seconds(5)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
}

/// The stored refresh value is check-then-act without a transaction. An
/// interleaving where logout lands between refresh's read and write leaves
/// the rotated token in place (last write wins). This test pins down that
/// known, documented resolution rather than hiding it.
#[test]
fn refresh_and_logout_interleaving_is_last_write_wins() {
    let (manager, store, now) = setup();

    let tokens = register(&manager, "a@x.com", now);

    // refresh reads + validates, then logout clears, then refresh's write
    // lands: the store ends with the rotated token, so the logout is undone.
    // (Driven sequentially here; the store itself only guarantees
    // single-record write atomicity.)
    let rotated = manager.refresh(&tokens.refresh_token, now + Duration::seconds(1)).unwrap();
    manager.logout(tokens.account_id).unwrap();
    store
        .set_refresh_token(tokens.account_id, Some(&rotated.refresh_token))
        .unwrap();

    assert!(manager.refresh(&rotated.refresh_token, now + Duration::seconds(2)).is_ok());
}

// ---------------------------------------------------------------------------
// Store failure propagation
// ---------------------------------------------------------------------------

/// Store double that fails every call, as a credential database outage would.
struct UnavailableStore;

impl CredentialStore for UnavailableStore {
    fn insert(
        &self,
        _record: quillpress_auth::CredentialRecord,
    ) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }

    fn find_by_id(
        &self,
        _id: AccountId,
    ) -> Result<Option<quillpress_auth::CredentialRecord>, CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }

    fn find_by_login_key(
        &self,
        _login_key: &str,
    ) -> Result<Option<quillpress_auth::CredentialRecord>, CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }

    fn set_refresh_token(
        &self,
        _id: AccountId,
        _token: Option<&str>,
    ) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }

    fn record_login(
        &self,
        _id: AccountId,
        _refresh_token: &str,
        _at: DateTime<Utc>,
    ) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }

    fn set_role(&self, _id: AccountId, _role: Role) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }

    fn set_permissions(
        &self,
        _id: AccountId,
        _permissions: PermissionSet,
    ) -> Result<(), CredentialStoreError> {
        Err(CredentialStoreError::Unavailable("connection refused".into()))
    }
}

#[test]
fn store_outage_surfaces_as_retryable_not_as_a_security_failure() {
    quillpress_observability::init();
    let manager = SessionManager::new(&test_config(), Arc::new(UnavailableStore));
    let now = Utc::now();

    let err = login(&manager, "a@x.com", "Secret1!", now).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert_eq!(err.kind().http_status(), 503);

    let err = manager.logout(AccountId::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}
