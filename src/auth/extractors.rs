use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{error::AppError, gateway::GatewayState, users::User};

/// Live user behind a valid bearer token.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<GatewayState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let keys = state
            .keys
            .as_ref()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("auth is disabled")))?;

        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        // Expect "Bearer <token>"
        let token = match auth.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => return Err(AppError::Unauthorized("Not authenticated".into())),
        };

        let claims = keys.validate(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Invalid token".into())
        })?;

        let user = state.users.find_by_email(&claims.sub).await?.ok_or_else(|| {
            warn!(subject = %claims.sub, "token subject no longer exists");
            AppError::Unauthorized("User not found".into())
        })?;

        Ok(CurrentUser(user))
    }
}
