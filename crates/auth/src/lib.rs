//! `quillpress-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: token
//! verification, password hashing, and authorization decisions are
//! deterministic functions of their inputs plus the immutable [`AuthConfig`].

pub mod account;
pub mod authorize;
pub mod claims;
pub mod config;
pub mod content;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod token;

pub use account::{AccountProfile, CredentialRecord, normalize_login_key};
pub use authorize::{
    ContentAction, authorize_content, check_archive, check_publish, check_view, filter_visible,
    is_visible_to, permission_gate, role_gate,
};
pub use claims::{AccessClaims, Principal, RefreshClaims};
pub use config::AuthConfig;
pub use content::{ContentStatus, ContentView};
pub use password::PasswordService;
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use token::{TokenError, TokenKind, TokenSigner};
