//! Credential record storage boundary.
//!
//! This module defines an infrastructure-facing abstraction over account
//! records without making any storage assumptions. The store is the single
//! authority for refresh-token validity: tokens are revoked by clearing or
//! superseding the stored value, independent of their cryptographic validity.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryCredentialStore;
pub use r#trait::{CredentialStore, CredentialStoreError};
