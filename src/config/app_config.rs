use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `file` or `postgres`
    pub backend: String,
    /// JSON document used by the file backend
    pub path: PathBuf,
    /// Connection URL used by the postgres backend
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Role granted the right to edit every known role
    pub super_admin_role: String,
    pub role_hierarchy: Vec<RoleHierarchyEntry>,
    pub password_hashing: PasswordHashingConfig,
}

/// One `role -> implied roles` edge set of the role hierarchy
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RoleHierarchyEntry {
    pub role: String,
    #[serde(default)]
    pub implies: Vec<String>,
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordHashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            path: PathBuf::from("var/users.json"),
            database_url: None,
            max_connections: 2,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            super_admin_role: "ROLE_SUPER_ADMIN".to_string(),
            role_hierarchy: vec![
                RoleHierarchyEntry {
                    role: "ROLE_ADMIN".to_string(),
                    implies: vec!["ROLE_USER".to_string()],
                },
                RoleHierarchyEntry {
                    role: "ROLE_SUPER_ADMIN".to_string(),
                    implies: vec![
                        "ROLE_ADMIN".to_string(),
                        "ROLE_ALLOWED_TO_SWITCH".to_string(),
                    ],
                },
            ],
            password_hashing: PasswordHashingConfig::default(),
        }
    }
}

impl Default for PasswordHashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl AppConfig {
    /// Load configuration from `config/default`, `config/local`, an optional
    /// explicit file, and `USER_ADMIN__*` environment variables, in that order
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("USER_ADMIN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
