use axum::{extract::State, routing::post, Form, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{TokenRequest, TokenResponse},
        services::{authenticate, AuthError},
    },
    error::AppError,
    gateway::GatewayState,
};

pub fn token_routes() -> Router<GatewayState> {
    Router::new().route("/token", post(login))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<GatewayState>,
    Form(form): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let keys = state
        .keys
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Not Found".into()))?;

    let email = form.username.trim();
    if email.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation("Missing username or password".into()));
    }

    let user = match authenticate(state.users.as_ref(), email, &form.password).await {
        Ok(u) => u,
        Err(AuthError::NotFound | AuthError::InvalidCredentials) => {
            return Err(AppError::Validation("Incorrect username or password".into()));
        }
        Err(AuthError::Store(e)) => return Err(AppError::Internal(e)),
    };

    let access_token = keys.issue_token(&user.email, Some(keys.login_ttl))?;
    info!(user_id = user.id, email = %user.email, "token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
