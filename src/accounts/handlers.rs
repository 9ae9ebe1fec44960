use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    accounts::{
        dto::{ForgotPasswordForm, MessageResponse, SessionUser, SigninForm, SignupForm},
        services::{register, reset_password},
        AccountsState,
    },
    auth::services::{authenticate, AuthError},
    error::AppError,
    users::PublicUser,
};

const SESSION_USER_ID: &str = "user_id";
const SESSION_USER_NAME: &str = "user_name";

pub fn account_routes() -> Router<AccountsState> {
    Router::new()
        .route("/", get(list_users))
        .route("/health", get(|| async { "ok" }))
        .route("/signup", post(signup))
        .route("/add", post(add_user))
        .route("/signin", post(signin))
        .route("/session", get(current_session))
        .route("/logout", get(logout))
        .route("/forgot-password", post(forgot_password))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AccountsState>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AccountsState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, AppError> {
    register(state.users.as_ref(), form).await?;
    Ok(Redirect::to("/signin"))
}

#[instrument(skip(state, form))]
pub async fn add_user(
    State(state): State<AccountsState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, AppError> {
    register(state.users.as_ref(), form).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip(state, session, form))]
pub async fn signin(
    State(state): State<AccountsState>,
    session: Session,
    Form(form): Form<SigninForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = form.email.trim();
    let password = form.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Missing email or password.".into()));
    }

    let user = match authenticate(state.users.as_ref(), email, password).await {
        Ok(u) => u,
        Err(AuthError::NotFound | AuthError::InvalidCredentials) => {
            return Err(AppError::InvalidCredentials)
        }
        Err(AuthError::Store(e)) => return Err(AppError::Internal(e)),
    };

    session.cycle_id().await?;
    session.insert(SESSION_USER_ID, user.id).await?;
    session.insert(SESSION_USER_NAME, &user.name).await?;

    info!(user_id = user.id, "user signed in");
    Ok(Json(MessageResponse {
        message: format!("Welcome, {}!", user.name),
    }))
}

pub async fn current_session(session: Session) -> Result<Json<SessionUser>, AppError> {
    let user_id = session.get::<i32>(SESSION_USER_ID).await?;
    let user_name = session.get::<String>(SESSION_USER_NAME).await?;
    match (user_id, user_name) {
        (Some(user_id), Some(user_name)) => Ok(Json(SessionUser { user_id, user_name })),
        _ => Err(AppError::Unauthorized("Not signed in".into())),
    }
}

pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await?;
    Ok(Redirect::to("/signin"))
}

#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AccountsState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = form.email.trim();
    if let Err(e) = reset_password(
        state.users.as_ref(),
        state.mailer.as_ref(),
        email,
        &state.app_name,
    )
    .await
    {
        warn!(error = %e, "password reset failed");
        return Err(e);
    }

    Ok(Json(MessageResponse {
        message: format!("New password has been sent to {email}. Check your inbox."),
    }))
}
