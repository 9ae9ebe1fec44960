use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};

use crate::{
    error::AppError,
    links::{
        backends::LinkBackends,
        dto::{PostLinkForm, RankedLink, VoteForm},
        services,
    },
};

pub fn link_routes() -> Router<LinkBackends> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/post", post(post_link))
        .route("/vote", post(vote))
}

pub async fn index(State(backends): State<LinkBackends>) -> Result<Json<Vec<RankedLink>>, AppError> {
    Ok(Json(services::list_links(&backends).await?))
}

pub async fn post_link(
    State(backends): State<LinkBackends>,
    Form(form): Form<PostLinkForm>,
) -> Result<Redirect, AppError> {
    services::post_link(&backends, &form.url, &form.title).await?;
    Ok(Redirect::to("/"))
}

pub async fn vote(
    State(backends): State<LinkBackends>,
    Form(form): Form<VoteForm>,
) -> Result<Redirect, AppError> {
    services::vote(&backends, &form.id).await?;
    Ok(Redirect::to("/"))
}
