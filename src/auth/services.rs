use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::{
    auth::password::verify_password,
    users::{CredentialStore, User},
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks an email/password pair against the stored argon2 hash.
#[instrument(skip(store, password))]
pub async fn authenticate(
    store: &dyn CredentialStore,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = store.find_by_email(email).await?.ok_or_else(|| {
        warn!(email, "login unknown email");
        AuthError::NotFound
    })?;

    // A malformed stored hash cannot match anything.
    let ok = verify_password(password, &user.password_hash).unwrap_or(false);
    if !ok {
        warn!(email, user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::password::hash_password,
        users::{memory::MemoryCredentialStore, NewUser},
    };
    use rust_decimal::Decimal;

    async fn store_with_ana() -> MemoryCredentialStore {
        let store = MemoryCredentialStore::default();
        store
            .create(NewUser {
                name: "Ana".into(),
                email: "ana@x.com".into(),
                password_hash: hash_password("pw123").unwrap(),
                salary: Decimal::ZERO,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn authenticate_returns_matching_user() {
        let store = store_with_ana().await;
        let user = authenticate(&store, "ana@x.com", "pw123").await.unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@x.com");
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let store = store_with_ana().await;
        let err = authenticate(&store, "ana@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_unknown_email_is_not_found() {
        let store = store_with_ana().await;
        let err = authenticate(&store, "bob@x.com", "pw123").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn authenticate_treats_legacy_plaintext_as_mismatch() {
        let store = MemoryCredentialStore::default();
        store
            .create(NewUser {
                name: "Old".into(),
                email: "old@x.com".into(),
                password_hash: "pw123".into(),
                salary: Decimal::ZERO,
            })
            .await
            .unwrap();
        let err = authenticate(&store, "old@x.com", "pw123").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ana@x.com"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("a na@x.com"));
        assert!(!is_valid_email(""));
    }
}
