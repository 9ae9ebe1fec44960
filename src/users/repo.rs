use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// First user with this email, by id.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
    /// Overwrites the hash of every user with this email; returns rows touched.
    async fn update_password_hash(&self, email: &str, password_hash: &str) -> anyhow::Result<u64>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
}

#[derive(Clone)]
pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, salary
            FROM users
            WHERE email = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, salary)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, salary
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.salary)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_password_hash(&self, email: &str, password_hash: &str) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"UPDATE users SET password = $1 WHERE email = $2"#)
            .bind(password_hash)
            .bind(email)
            .execute(&self.db)
            .await
            .context("update password hash")?;
        Ok(res.rows_affected())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password, salary FROM users ORDER BY id"#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }
}
