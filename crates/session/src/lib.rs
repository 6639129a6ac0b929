//! `quillpress-session` — session lifecycle orchestration.
//!
//! Composes the credential store, password service, and token signer into
//! the boundary operations route handlers call: register, login,
//! verify-access, refresh, logout, profile.

pub mod dto;
pub mod manager;

pub use dto::{LoginRequest, RefreshedTokens, RegisterRequest, SessionTokens};
pub use manager::SessionManager;
