use tracing::{info, instrument};

use crate::{
    error::AppError,
    links::{
        backends::{link_id, LinkBackends},
        dto::{NewLink, RankedLink, VoteRequest},
    },
};

#[instrument(skip(backends))]
pub async fn list_links(backends: &LinkBackends) -> Result<Vec<RankedLink>, AppError> {
    let links = backends
        .list()
        .await
        .map_err(|e| AppError::Upstream(format!("Error contacting DB: {e}")))?;

    Ok(links
        .into_iter()
        .enumerate()
        .map(|(i, l)| RankedLink {
            rank: i + 1,
            id: l.id,
            url: l.url,
            title: l.title,
            points: l.points,
        })
        .collect())
}

/// Relays a new link; returns the id derived from its URL.
#[instrument(skip(backends))]
pub async fn post_link(backends: &LinkBackends, url: &str, title: &str) -> Result<u16, AppError> {
    let (url, title) = (url.trim(), title.trim());
    if url.is_empty() || title.is_empty() {
        return Err(AppError::Validation("Missing URL or Title".into()));
    }

    let id = link_id(url);
    backends
        .post("post", &NewLink { id, url, title })
        .await
        .map_err(|e| AppError::Upstream(format!("Error posting to DB: {e}")))?;
    info!(id, "link posted");
    Ok(id)
}

#[instrument(skip(backends))]
pub async fn vote(backends: &LinkBackends, raw_id: &str) -> Result<(), AppError> {
    let raw_id = raw_id.trim();
    if raw_id.is_empty() {
        return Err(AppError::Validation("Missing ID".into()));
    }
    let id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::Validation("Invalid ID".into()))?;

    backends
        .post("vote", &VoteRequest { id })
        .await
        .map_err(|e| AppError::Upstream(format!("Error voting: {e}")))?;
    info!(id, "vote relayed");
    Ok(())
}
