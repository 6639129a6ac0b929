//! Process-wide auth configuration.
//!
//! Constructed once at startup and passed by reference into the token signer
//! and session manager; component logic never reads environment state.

use chrono::Duration;

/// Immutable configuration for the auth core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 secret for access tokens. Must differ from the refresh secret so
    /// compromise of one does not compromise the other.
    pub access_token_secret: String,
    /// HS256 secret for refresh tokens.
    pub refresh_token_secret: String,
    /// Access-token lifetime (short-lived).
    pub access_token_ttl: Duration,
    /// Refresh-token lifetime (long-lived).
    pub refresh_token_ttl: Duration,
    /// Leeway applied to expiry comparison only, never to signature checks.
    pub clock_skew: Duration,
    /// Argon2 time cost (iterations). Raising it never invalidates stored
    /// hashes; verification reads parameters from the PHC string.
    pub hash_time_cost: u32,
    /// Minimum accepted password length at registration.
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: "dev-access-secret".to_string(),
            refresh_token_secret: "dev-refresh-secret".to_string(),
            access_token_ttl: Duration::hours(2),
            refresh_token_ttl: Duration::days(14),
            clock_skew: Duration::zero(),
            hash_time_cost: 2,
            min_password_len: 8,
        }
    }
}

impl AuthConfig {
    /// Read configuration from the environment, falling back to dev defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let access_token_secret = std::env::var("ACCESS_TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("ACCESS_TOKEN_SECRET not set; using insecure dev default");
            defaults.access_token_secret.clone()
        });
        let refresh_token_secret = std::env::var("REFRESH_TOKEN_SECRET").unwrap_or_else(|_| {
            tracing::warn!("REFRESH_TOKEN_SECRET not set; using insecure dev default");
            defaults.refresh_token_secret.clone()
        });

        let config = Self {
            access_token_secret,
            refresh_token_secret,
            access_token_ttl: env_i64("ACCESS_TOKEN_TTL_HOURS")
                .map(Duration::hours)
                .unwrap_or(defaults.access_token_ttl),
            refresh_token_ttl: env_i64("REFRESH_TOKEN_TTL_DAYS")
                .map(Duration::days)
                .unwrap_or(defaults.refresh_token_ttl),
            clock_skew: env_i64("TOKEN_CLOCK_SKEW_SECS")
                .map(Duration::seconds)
                .unwrap_or(defaults.clock_skew),
            hash_time_cost: env_i64("PASSWORD_HASH_COST")
                .and_then(checked_u32)
                .unwrap_or(defaults.hash_time_cost),
            min_password_len: env_i64("MIN_PASSWORD_LEN")
                .map(|v| v as usize)
                .unwrap_or(defaults.min_password_len),
        };

        if config.access_token_secret == config.refresh_token_secret {
            tracing::warn!("access and refresh token secrets are identical; use distinct secrets");
        }

        config
    }
}

fn env_i64(key: &str) -> Option<i64> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<i64>() {
        Ok(v) if v >= 0 => Some(v),
        _ => {
            tracing::warn!(key, "ignoring unparseable configuration value");
            None
        }
    }
}

/// Narrow a parsed value without silent truncation; out-of-range values fall
/// back to the default rather than wrapping to a tiny cost.
fn checked_u32(v: i64) -> Option<u32> {
    match u32::try_from(v) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(value = v, "configuration value out of u32 range; using default");
            None
        }
    }
}
