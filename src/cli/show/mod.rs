//! show command - prints a user's status and roles

use std::io::Write;

use clap::Args;

use crate::domain::user::UserRepository;
use crate::infrastructure::user::{PasswordEncoder, UserManager};

/// Arguments for the show command
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// The username
    pub username: String,
}

pub async fn run<R, H>(
    manager: &UserManager<R, H>,
    args: ShowArgs,
    out: &mut dyn Write,
) -> anyhow::Result<()>
where
    R: UserRepository + ?Sized,
    H: PasswordEncoder,
{
    let user = manager.require_user(&args.username).await?;

    writeln!(out, "Username: {}", user.username())?;
    writeln!(out, "Enabled:  {}", if user.is_enabled() { "yes" } else { "no" })?;
    writeln!(out, "Roles:    {}", user.roles().join(", "))?;
    writeln!(out, "Updated:  {}", user.updated_at().to_rfc3339())?;

    Ok(())
}
