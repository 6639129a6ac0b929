//! Token issuer/verifier (HS256 via `jsonwebtoken`).
//!
//! Access and refresh tokens are signed with distinct secrets and distinct
//! expiry policies. Signature checks are delegated to `jsonwebtoken`; expiry
//! is compared against the caller-supplied `now` so verification is
//! deterministic, with the configured clock-skew leeway applied to the
//! expiry comparison only.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use quillpress_core::AccountId;

use crate::{AccessClaims, AuthConfig, PermissionSet, RefreshClaims, Role};

/// Discriminator embedded in every token so a refresh token can never be
/// presented where an access token is expected (and vice versa), even if the
/// secrets were ever misconfigured to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not decodable, signature mismatch, wrong kind, or an invalid time
    /// window. Deliberately coarse: callers must not learn why a forged
    /// token failed.
    #[error("token is malformed")]
    Malformed,

    /// Structurally valid but past its expiry claim.
    #[error("token has expired")]
    Expired,

    /// Encoding-side fault. Internal; never caused by caller input.
    #[error("token signing failed")]
    Signing,
}

/// Issues and verifies both token kinds. Cheap to clone-free share by
/// reference; holds derived keys, never the raw config.
pub struct TokenSigner {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    leeway_secs: i64,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
            leeway_secs: config.clock_skew.num_seconds(),
        }
    }

    pub fn issue_access(
        &self,
        sub: AccountId,
        login_key: &str,
        role: Role,
        permissions: &PermissionSet,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = AccessClaims {
            jti: Uuid::now_v7(),
            sub,
            login_key: login_key.to_string(),
            role,
            permissions: permissions.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
            kind: TokenKind::Access,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(|_| TokenError::Signing)
    }

    pub fn issue_refresh(&self, sub: AccountId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = RefreshClaims {
            jti: Uuid::now_v7(),
            sub,
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
            kind: TokenKind::Refresh,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify an access token. Pure: no storage involved.
    pub fn verify_access(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = decode(token, &self.access_decoding, &self.validation())
            .map_err(|_| TokenError::Malformed)?
            .claims;
        if claims.kind != TokenKind::Access {
            return Err(TokenError::Malformed);
        }
        self.validate_window(claims.iat, claims.exp, now)?;
        Ok(claims)
    }

    /// Verify a refresh token's signature and window.
    ///
    /// Revocation (equality with the stored value) is a storage concern and
    /// is checked by the session manager, not here.
    pub fn verify_refresh(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = decode(token, &self.refresh_decoding, &self.validation())
            .map_err(|_| TokenError::Malformed)?
            .claims;
        if claims.kind != TokenKind::Refresh {
            return Err(TokenError::Malformed);
        }
        self.validate_window(claims.iat, claims.exp, now)?;
        Ok(claims)
    }

    /// Signature/shape validation only; the time window is checked against
    /// the explicit `now` in `validate_window`.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }

    fn validate_window(&self, iat: i64, exp: i64, now: DateTime<Utc>) -> Result<(), TokenError> {
        if exp <= iat {
            return Err(TokenError::Malformed);
        }
        // Skew leeway applies to the expiry comparison only.
        if now.timestamp() < iat {
            return Err(TokenError::Malformed);
        }
        if now.timestamp() >= exp + self.leeway_secs {
            return Err(TokenError::Expired);
        }
        Ok(())
    }
}
