//! Credential Store: the `users` table and the only code allowed to write it.

#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;

pub use repo::{CredentialStore, PgCredentialStore};
pub use repo_types::{NewUser, PublicUser, User};
