use anyhow::Context;
use axum::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, Column, Executor, PgPool, Statement};

use crate::gateway::dto::TableRows;

#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Tables and views of the configured schema, by name.
    async fn list_tables(&self) -> anyhow::Result<Vec<String>>;
    /// Every row of `table`. Callers must pass a name taken from `list_tables`.
    async fn select_all(&self, table: &str) -> anyhow::Result<TableRows>;
}

pub struct PgCatalog {
    db: PgPool,
    schema: String,
}

impl PgCatalog {
    pub fn new(db: PgPool, schema: impl Into<String>) -> Self {
        Self {
            db,
            schema: schema.into(),
        }
    }
}

/// Double-quotes an identifier, doubling any embedded quote.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `SELECT *` over a schema-qualified, quoted table.
pub fn select_all_sql(schema: &str, table: &str) -> String {
    format!("SELECT * FROM {}.{}", quote_ident(schema), quote_ident(table))
}

/// Wraps `sql` so each row comes back as one JSON object keyed by column name.
pub fn row_json_sql(sql: &str) -> String {
    format!("SELECT row_to_json(q) FROM ({sql}) AS q")
}

/// Lays JSON records out in `columns` order; missing keys become null.
pub fn project_rows(columns: &[String], records: Vec<Map<String, Value>>) -> Vec<Vec<Value>> {
    records
        .into_iter()
        .map(|mut record| {
            columns
                .iter()
                .map(|c| record.remove(c).unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}

#[async_trait]
impl TableCatalog for PgCatalog {
    async fn list_tables(&self) -> anyhow::Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1
            ORDER BY table_name
            "#,
        )
        .bind(&self.schema)
        .fetch_all(&self.db)
        .await
        .context("list tables")?;
        Ok(names)
    }

    async fn select_all(&self, table: &str) -> anyhow::Result<TableRows> {
        let sql = select_all_sql(&self.schema, table);

        let mut conn = self.db.acquire().await?;

        // Column names come from the statement description so empty tables still report them.
        let columns: Vec<String> = {
            let stmt = (&mut *conn).prepare(sql.as_str()).await?;
            stmt.columns().iter().map(|c| c.name().to_string()).collect()
        };

        let wrapped = row_json_sql(&sql);
        let records = sqlx::query_scalar::<_, Json<Map<String, Value>>>(&wrapped)
            .fetch_all(&mut *conn)
            .await?;

        let rows = project_rows(&columns, records.into_iter().map(|Json(r)| r).collect());

        Ok(TableRows { columns, rows })
    }
}
