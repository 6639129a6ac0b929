//! `quillpress-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{AuthError, AuthResult, ErrorKind};
pub use id::{AccountId, ContentId};
