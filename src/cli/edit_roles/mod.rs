//! edit-roles command - replaces the roles an actor is allowed to edit
//!
//! Mirrors an edit form: the actor's roles decide which roles are offered,
//! `--role` is the submitted selection, and roles outside the offer are kept.

use std::io::Write;

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::role::{validate_roles, EditableRolesBuilder, RestoreRolesTransformer};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::{PasswordEncoder, UserManager};

/// Arguments for the edit-roles command
#[derive(Debug, Clone, Args)]
pub struct EditRolesArgs {
    /// The username
    pub username: String,

    /// Role held by the acting administrator, repeatable
    #[arg(long = "as", value_name = "ROLE", required = true)]
    pub actor_roles: Vec<String>,

    /// Editable role the user should hold, repeatable; omit to revoke all editable roles
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,
}

/// Apply a role selection submitted by an actor limited to `builder`'s roles
pub async fn apply_role_selection<R, H, B>(
    manager: &UserManager<R, H>,
    builder: B,
    username: &str,
    selected: Vec<String>,
) -> Result<User, DomainError>
where
    R: UserRepository + ?Sized,
    H: PasswordEncoder,
    B: EditableRolesBuilder,
{
    validate_roles(&selected).map_err(|e| DomainError::validation(e.to_string()))?;

    let mut user = manager.require_user(username).await?;

    let mut transformer = RestoreRolesTransformer::new(builder);
    transformer.set_original_roles(Some(user.roles().to_vec()));

    let editable = transformer.roles_builder().roles();
    if let Some(role) = selected.iter().find(|role| !editable.contains_key(role.as_str())) {
        return Err(DomainError::validation(format!(
            "Role '{}' is not editable by the acting user",
            role
        )));
    }

    let roles = transformer.reconcile(Some(selected))?;
    user.set_roles(roles);

    let user = manager.save(user).await?;
    info!(username = %user.username(), roles = ?user.roles(), "Updated roles");

    Ok(user)
}

pub async fn run<R, H>(
    manager: &UserManager<R, H>,
    config: &AppConfig,
    args: EditRolesArgs,
    out: &mut dyn Write,
) -> anyhow::Result<()>
where
    R: UserRepository + ?Sized,
    H: PasswordEncoder,
{
    let builder = crate::create_roles_builder(&config.security, args.actor_roles);
    let user = apply_role_selection(manager, builder, &args.username, args.roles).await?;

    writeln!(
        out,
        "Updated roles for user {}: {}",
        user.username(),
        user.roles().join(", ")
    )?;

    Ok(())
}
