use tracing::{error, instrument, warn};

use crate::{
    error::AppError,
    gateway::{catalog::TableCatalog, dto::TableRows},
};

pub async fn list_tables(catalog: &dyn TableCatalog) -> Result<Vec<String>, AppError> {
    catalog
        .list_tables()
        .await
        .map_err(|e| AppError::Query(format!("{e:#}")))
}

/// Catalog entry for `name`: an exact match, else the single case-insensitive match.
pub fn resolve_table<'a>(known: &'a [String], name: &str) -> Option<&'a str> {
    if let Some(t) = known.iter().find(|t| *t == name) {
        return Some(t.as_str());
    }
    let mut folded = known.iter().filter(|t| t.eq_ignore_ascii_case(name));
    match (folded.next(), folded.next()) {
        (Some(t), None) => Some(t.as_str()),
        _ => None,
    }
}

/// Reads a whole table after checking `name` against the catalog.
#[instrument(skip(catalog))]
pub async fn query_table(catalog: &dyn TableCatalog, name: &str) -> Result<TableRows, AppError> {
    let known = list_tables(catalog).await?;
    let Some(table) = resolve_table(&known, name) else {
        warn!(table = name, "table not in catalog");
        return Err(AppError::NotFound(format!("Table '{name}' not found")));
    };

    catalog.select_all(table).await.map_err(|e| {
        error!(error = %e, table = name, "query failed");
        AppError::Query(format!("{e:#}"))
    })
}
