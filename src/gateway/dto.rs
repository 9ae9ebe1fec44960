use serde::Serialize;
use serde_json::Value;

/// Result of a full-table read: `rows[i].len() == columns.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct TableRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}
