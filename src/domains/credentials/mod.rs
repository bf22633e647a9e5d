//! Credentials domain module.
//!
//! Credentials are created and refreshed by an external authentication flow
//! and cached on disk per (workspace, source). The bridge only reads them.
//! Callers depend on the `CredentialReader` trait so tests can inject a fake.

mod store;

pub use store::{Credential, CredentialLookup, CredentialReader, FileCredentialStore};

#[cfg(test)]
pub use store::StaticCredentials;
