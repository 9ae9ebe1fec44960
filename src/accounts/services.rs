use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::{
    accounts::{
        dto::SignupForm,
        mailer::{Mailer, OutgoingMail},
    },
    auth::{
        password::{generate_temp_password, hash_password},
        services::is_valid_email,
    },
    error::AppError,
    users::{CredentialStore, NewUser, User},
};

/// Validates the form, hashes the password and inserts the user.
#[instrument(skip(store, form), fields(email = %form.email.trim()))]
pub async fn register(store: &dyn CredentialStore, form: SignupForm) -> Result<User, AppError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let password = form.password.trim();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Missing name, email, or password.".into(),
        ));
    }
    if !is_valid_email(email) {
        warn!("invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    let salary = match form.salary.trim() {
        "" => Decimal::ZERO,
        raw => Decimal::from_str(raw)
            .map_err(|_| AppError::Validation("Invalid salary".into()))?,
    };

    let password_hash = hash_password(password)?;
    let user = store
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            salary,
        })
        .await?;

    info!(user_id = user.id, "user registered");
    Ok(user)
}

pub fn reset_mail(email: &str, app_name: &str, temp_password: &str) -> OutgoingMail {
    OutgoingMail {
        to: email.to_string(),
        subject: format!("[Password Reset] New Password for {app_name}"),
        body: format!(
            "Hello,\n\nYour new temporary password is: {temp_password}\n\n\
             Please sign in and change it immediately."
        ),
    }
}

/// Replaces the user's password with a random one and mails it.
///
/// The new hash is stored only after the provider accepted the mail, so a failed
/// delivery leaves the old password working.
#[instrument(skip(store, mailer))]
pub async fn reset_password(
    store: &dyn CredentialStore,
    mailer: &dyn Mailer,
    email: &str,
    app_name: &str,
) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Missing email.".into()));
    }

    let user = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("No user found with this email.".into()))?;

    let temp_password = generate_temp_password();
    let password_hash = hash_password(&temp_password)?;

    mailer
        .send(&reset_mail(email, app_name, &temp_password))
        .await
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "reset mail not delivered; password unchanged");
            AppError::Upstream(format!("Error resetting password: {e}"))
        })?;

    // last write wins when resets race
    store
        .update_password_hash(email, &password_hash)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "reset mail sent but new hash not stored");
            AppError::Internal(e)
        })?;

    info!(user_id = user.id, "password reset");
    Ok(())
}
