//! Query Gateway: lists tables of one schema and returns their rows.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::{
    auth::{handlers::token_routes, JwtKeys},
    config::GatewayConfig,
    users::{CredentialStore, PgCredentialStore},
};

pub mod catalog;
pub mod dto;
pub mod handlers;
pub mod services;

use catalog::{PgCatalog, TableCatalog};

#[derive(Clone)]
pub struct GatewayState {
    pub users: Arc<dyn CredentialStore>,
    pub catalog: Arc<dyn TableCatalog>,
    /// `None` when the gateway runs without authentication.
    pub keys: Option<JwtKeys>,
}

impl GatewayState {
    pub fn new(db: PgPool, config: &GatewayConfig) -> Self {
        Self {
            users: Arc::new(PgCredentialStore::new(db.clone())),
            catalog: Arc::new(PgCatalog::new(db, config.schema.clone())),
            keys: config.jwt.as_ref().map(JwtKeys::from_config),
        }
    }
}

pub fn router(state: GatewayState) -> Router {
    let tables = if state.keys.is_some() {
        token_routes().merge(handlers::protected_routes())
    } else {
        tracing::warn!("gateway running without authentication");
        handlers::open_routes()
    };

    Router::new()
        .merge(handlers::public_routes())
        .merge(tables)
        .with_state(state)
}
