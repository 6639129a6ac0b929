use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quillpress_core::AccountId;

use crate::{PermissionSet, Role, token::TokenKind};

/// Access-token claims (transport payload, HS256-signed).
///
/// Role and permissions ride inside the token so access verification never
/// touches storage. Consequence: a role change takes effect on tokens issued
/// *after* the change; tokens already in flight keep their old privilege
/// until expiry. That trade-off is deliberate and covered by tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Unique token id. Makes every issued token distinct even when the
    /// remaining claims and the issue second coincide.
    pub jti: Uuid,
    /// Subject: account identity.
    pub sub: AccountId,
    /// Login key at issue time (convenience for handlers; not used for auth).
    pub login_key: String,
    pub role: Role,
    pub permissions: PermissionSet,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Token kind discriminator; rejects cross-use of refresh tokens.
    pub kind: TokenKind,
}

/// Refresh-token claims. Identity and window only; everything else is
/// re-read from the credential record when the token is redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub jti: Uuid,
    pub sub: AccountId,
    pub iat: i64,
    pub exp: i64,
    pub kind: TokenKind,
}

/// Per-request caller view for authorization decisions.
///
/// Derived from a verified access token on every request and never cached
/// across requests or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub account_id: AccountId,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl From<&AccessClaims> for Principal {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            account_id: claims.sub,
            role: claims.role,
            permissions: claims.permissions.clone(),
        }
    }
}
