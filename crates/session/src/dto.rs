//! Typed request/response shapes for the boundary operations.
//!
//! Wire-level binding (HTTP, extractors) is the excluded web-framework
//! layer; these are the shapes it maps onto.

use serde::{Deserialize, Serialize};

use quillpress_core::AccountId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub login_key: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub login_key: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// Issued at registration and login.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTokens {
    pub account_id: AccountId,
    pub access_token: String,
    pub refresh_token: String,
}

/// Issued by refresh. Carries a rotated refresh token: the presented one is
/// superseded in storage and will no longer redeem.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshedTokens {
    pub access_token: String,
    pub refresh_token: String,
}
