//! PostgreSQL user repository implementation

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str =
    "SELECT username, password_hash, roles, enabled, created_at, updated_at FROM users";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool and make sure the `users` table exists
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        info!("PostgreSQL connection established");

        let repository = Self::new(pool);
        repository.ensure_schema().await?;

        Ok(repository)
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username      TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                roles         TEXT[] NOT NULL DEFAULT '{}',
                enabled       BOOLEAN NOT NULL DEFAULT TRUE,
                created_at    TIMESTAMPTZ NOT NULL,
                updated_at    TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("{} WHERE username = $1", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user by username: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, roles, enabled, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.roles())
        .bind(user.is_enabled())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(format!("Username '{}' already exists", user.username()))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, roles = $3, enabled = $4, updated_at = $5
            WHERE username = $1
            "#,
        )
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.roles())
        .bind(user.is_enabled())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::user_not_found(user.username()));
        }

        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let sql = format!("{} ORDER BY username", SELECT_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let read_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    Ok(User::restore(
        row.try_get("username").map_err(read_error)?,
        row.try_get("password_hash").map_err(read_error)?,
        row.try_get("roles").map_err(read_error)?,
        row.try_get("enabled").map_err(read_error)?,
        row.try_get("created_at").map_err(read_error)?,
        row.try_get("updated_at").map_err(read_error)?,
    ))
}
