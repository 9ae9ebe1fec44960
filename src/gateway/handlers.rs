use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::CurrentUser,
    error::AppError,
    gateway::{
        dto::{RootResponse, TableRows, TablesResponse},
        services, GatewayState,
    },
};

pub fn public_routes() -> Router<GatewayState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(|| async { "ok" }))
}

/// Table routes guarded by a bearer token.
pub fn protected_routes() -> Router<GatewayState> {
    Router::new()
        .route("/tables", get(list_tables))
        .route("/query/:table_name", get(query_table))
}

/// Table routes without authentication.
pub fn open_routes() -> Router<GatewayState> {
    Router::new()
        .route("/tables", get(list_tables_open))
        .route("/query/:table_name", get(query_table_open))
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "API is running!",
    })
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_tables(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TablesResponse>, AppError> {
    list_tables_open(State(state)).await
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn query_table(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
    Path(table_name): Path<String>,
) -> Result<Json<TableRows>, AppError> {
    query_table_open(State(state), Path(table_name)).await
}

pub async fn list_tables_open(
    State(state): State<GatewayState>,
) -> Result<Json<TablesResponse>, AppError> {
    let tables = services::list_tables(state.catalog.as_ref()).await?;
    Ok(Json(TablesResponse { tables }))
}

pub async fn query_table_open(
    State(state): State<GatewayState>,
    Path(table_name): Path<String>,
) -> Result<Json<TableRows>, AppError> {
    let rows = services::query_table(state.catalog.as_ref(), &table_name).await?;
    info!(table = %table_name, rows = rows.rows.len(), "table queried");
    Ok(Json(rows))
}
