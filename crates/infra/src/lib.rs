//! `quillpress-infra` — infrastructure boundaries for the auth core.
//!
//! Storage abstractions live here; domain crates stay storage-agnostic.

pub mod credential_store;

pub use credential_store::{CredentialStore, CredentialStoreError, InMemoryCredentialStore};
