//! User store selection from configuration

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::StorageConfig;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;

use super::file_repository::JsonFileUserRepository;
use super::postgres_repository::PostgresUserRepository;
use super::repository::InMemoryUserRepository;

/// Supported user store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStoreType {
    /// Process-local store, lost on exit
    InMemory,
    /// Single JSON document on disk
    File,
    /// PostgreSQL `users` table
    Postgres,
}

impl UserStoreType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "file" | "json" => Some(Self::File),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Build the configured user repository
pub async fn create_user_repository(
    config: &StorageConfig,
) -> Result<Arc<dyn UserRepository>, DomainError> {
    let store_type = UserStoreType::parse(&config.backend).ok_or_else(|| {
        DomainError::configuration(format!("Unknown storage backend '{}'", config.backend))
    })?;

    info!(backend = ?store_type, "Opening user store");

    let repository: Arc<dyn UserRepository> = match store_type {
        UserStoreType::InMemory => Arc::new(InMemoryUserRepository::new()),
        UserStoreType::File => Arc::new(JsonFileUserRepository::new(&config.path)),
        UserStoreType::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                DomainError::configuration("storage.database_url is required for postgres")
            })?;

            Arc::new(
                PostgresUserRepository::connect(
                    url,
                    config.max_connections,
                    Duration::from_secs(config.connect_timeout_secs),
                )
                .await?,
            )
        }
    };

    Ok(repository)
}
