//! Self-service user flows: signup, signin, logout, password reset.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_sessions::{cookie::SameSite, MemoryStore, SessionManagerLayer};

use crate::{
    config::AccountsConfig,
    users::{CredentialStore, PgCredentialStore},
};

pub mod dto;
pub mod handlers;
pub mod mailer;
pub mod services;

use mailer::{Mailer, SendGridMailer};

#[derive(Clone)]
pub struct AccountsState {
    pub users: Arc<dyn CredentialStore>,
    pub mailer: Arc<dyn Mailer>,
    pub app_name: String,
}

impl AccountsState {
    pub fn new(db: PgPool, config: &AccountsConfig) -> anyhow::Result<Self> {
        Ok(Self {
            users: Arc::new(PgCredentialStore::new(db)),
            mailer: Arc::new(SendGridMailer::new(&config.mail)?),
            app_name: config.app_name.clone(),
        })
    }
}

/// Sessions live in process memory and end with the browser session.
pub fn router(state: AccountsState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax);

    handlers::account_routes()
        .with_state(state)
        .layer(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accounts::mailer::memory::RecordingMailer, users::memory::MemoryCredentialStore};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryCredentialStore>, Arc<RecordingMailer>) {
        let users = Arc::new(MemoryCredentialStore::default());
        let mailer = Arc::new(RecordingMailer::default());
        let state = AccountsState {
            users: users.clone(),
            mailer: mailer.clone(),
            app_name: "tablegate".into(),
        };
        (router(state), users, mailer)
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut req = Request::builder().uri(uri);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        req.body(Body::empty()).unwrap()
    }

    fn session_cookie(res: &Response) -> String {
        let raw = res.headers()[header::SET_COOKIE].to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    async fn body_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const ANA: &str = "name=Ana&email=ana%40x.com&password=pw123";

    #[tokio::test]
    async fn signup_then_signin() {
        let (app, users, _) = app();

        let res = app.clone().oneshot(form("/signup", ANA, None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/signin");

        let stored = users.get("ana@x.com").unwrap();
        assert_ne!(stored.password_hash, "pw123");

        let res = app
            .clone()
            .oneshot(form("/signin", "email=ana%40x.com&password=pw123", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["message"], "Welcome, Ana!");

        let res = app
            .oneshot(form("/signin", "email=ana%40x.com&password=wrong", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signup_missing_fields_is_bad_request() {
        let (app, _, _) = app();
        let res = app
            .oneshot(form("/signup", "name=Ana&email=ana%40x.com", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn session_survives_until_logout() {
        let (app, _, _) = app();
        app.clone().oneshot(form("/add", ANA, None)).await.unwrap();

        let res = app
            .clone()
            .oneshot(form("/signin", "email=ana%40x.com&password=pw123", None))
            .await
            .unwrap();
        let cookie = session_cookie(&res);

        let res = app.clone().oneshot(get("/session", Some(&cookie))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["user_name"], "Ana");
        assert_eq!(body["user_id"], 1);

        let res = app.clone().oneshot(get("/logout", Some(&cookie))).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = app.oneshot(get("/session", Some(&cookie))).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn index_lists_users_without_hashes() {
        let (app, _, _) = app();
        app.clone().oneshot(form("/add", ANA, None)).await.unwrap();
        let res = app.oneshot(get("/", None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body[0]["email"], "ana@x.com");
        assert!(body[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn forgot_password_flow() {
        let (app, _, mailer) = app();
        app.clone().oneshot(form("/signup", ANA, None)).await.unwrap();

        let res = app
            .clone()
            .oneshot(form("/forgot-password", "email=nobody%40x.com", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app
            .clone()
            .oneshot(form("/forgot-password", "email=", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .oneshot(form("/forgot-password", "email=ana%40x.com", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }
}
