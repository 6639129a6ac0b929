//! Password hashing service (Argon2id, PHC string format).

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, Version};
use thiserror::Error;

use crate::AuthConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Hashing backend fault (invalid parameters, RNG failure). Internal;
    /// never caused by the plaintext itself.
    #[error("password hashing failed")]
    Hash,
}

/// One-way hash + verify with a fresh random salt per call.
#[derive(Debug, Clone)]
pub struct PasswordService {
    time_cost: u32,
    /// Hash of a throwaway plaintext, burned against during lookups that
    /// found no record so the unknown-login-key path costs the same as a
    /// wrong password. `None` only if hashing itself is broken.
    dummy_hash: Option<String>,
}

impl PasswordService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut svc = Self {
            time_cost: config.hash_time_cost,
            dummy_hash: None,
        };
        svc.dummy_hash = svc.hash("quillpress-dummy-password").ok();
        svc
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            self.time_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|_| PasswordError::Hash)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a plaintext password. Two calls with the same plaintext produce
    /// different PHC strings (random salt).
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|_| PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext against a stored PHC string.
    ///
    /// Parameters (including cost) are read from the stored string, so hashes
    /// written under an older cost keep verifying after a cost change. A
    /// malformed stored hash is "does not match", never an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Burn a full verification against the dummy hash and report a mismatch.
    ///
    /// Callers use this when there is no stored hash to check (unknown login
    /// key) so that path is timing-indistinguishable from a wrong password.
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        if let Some(dummy) = &self.dummy_hash {
            let _ = self.verify(plaintext, dummy);
        }
        false
    }
}
