//! user-admin
//!
//! User account administration:
//! - Password changes from the console, with interactive prompting
//! - Role reconciliation for edit forms that only expose editable roles
//! - JSON file and PostgreSQL user stores

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use crate::config::SecurityConfig;
use crate::domain::{HierarchyRolesBuilder, RoleHierarchy, UserRepository};
use crate::infrastructure::user::{create_user_repository, Argon2Encoder, UserManager};

/// Build the user manager for the configured store and hashing costs
pub async fn create_user_manager(
    config: &AppConfig,
) -> anyhow::Result<UserManager<dyn UserRepository, Argon2Encoder>> {
    let repository = create_user_repository(&config.storage).await?;

    let hashing = &config.security.password_hashing;
    let encoder =
        Argon2Encoder::with_params(hashing.memory_kib, hashing.iterations, hashing.parallelism)?;

    Ok(UserManager::new(repository, Arc::new(encoder)))
}

/// Role hierarchy declared in configuration
pub fn role_hierarchy(config: &SecurityConfig) -> RoleHierarchy {
    config
        .role_hierarchy
        .iter()
        .map(|entry| (entry.role.clone(), entry.implies.clone()))
        .collect()
}

/// Editable roles builder for an actor holding `actor_roles`
pub fn create_roles_builder(
    config: &SecurityConfig,
    actor_roles: Vec<String>,
) -> HierarchyRolesBuilder {
    HierarchyRolesBuilder::new(role_hierarchy(config), actor_roles)
        .with_super_admin_role(&config.super_admin_role)
}
