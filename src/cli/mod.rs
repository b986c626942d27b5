//! CLI module for user-admin
//!
//! Provides subcommands for administering user accounts:
//! - `change-password`: set a new password for a user
//! - `create`: create a user
//! - `edit-roles`: replace the roles an actor may edit, keeping the rest
//! - `show`: print a user's status and roles

pub mod change_password;
pub mod create;
pub mod edit_roles;
pub mod prompt;
pub mod show;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::AppConfig;
use crate::infrastructure::logging;

use self::prompt::{Prompter, TerminalPrompter};

/// user-admin - User account administration
#[derive(Debug, Parser)]
#[command(name = "user-admin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Do not ask any interactive question
    #[arg(short = 'n', long, global = true)]
    pub no_interaction: bool,

    /// Configuration file layered over config/default and config/local
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Change the password of a user
    ChangePassword(change_password::ChangePasswordArgs),

    /// Create a user
    Create(create::CreateArgs),

    /// Replace the editable roles of a user, keeping roles the actor cannot see
    EditRoles(edit_roles::EditRolesArgs),

    /// Show a user's status and roles
    Show(show::ShowArgs),
}

/// Load configuration, open the user store, and run the selected command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging);

    let manager = crate::create_user_manager(&config).await?;

    let interactive = !cli.no_interaction && std::io::stdin().is_terminal();
    debug!(interactive, "Dispatching command");

    let mut terminal = TerminalPrompter::new();
    let prompter: Option<&mut dyn Prompter> = if interactive {
        Some(&mut terminal)
    } else {
        None
    };

    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::ChangePassword(args) => {
            change_password::run(&manager, args, prompter, &mut out).await
        }
        Command::Create(args) => create::run(&manager, &config, args, prompter, &mut out).await,
        Command::EditRoles(args) => edit_roles::run(&manager, &config, args, &mut out).await,
        Command::Show(args) => show::run(&manager, args, &mut out).await,
    }
}

/// Names of required values still missing, in the usual error wording
pub(crate) fn missing_arguments(missing: &[&str]) -> anyhow::Error {
    anyhow::anyhow!("Not enough arguments (missing: \"{}\").", missing.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_change_password_without_arguments() {
        let cli = Cli::try_parse_from(["user-admin", "change-password"]).unwrap();

        match cli.command {
            Command::ChangePassword(args) => {
                assert!(args.username.is_none());
                assert!(args.password.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!cli.no_interaction);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "user-admin",
            "change-password",
            "matthieu",
            "mypassword",
            "-n",
            "--config",
            "admin.toml",
        ])
        .unwrap();

        assert!(cli.no_interaction);
        assert_eq!(cli.config, Some(PathBuf::from("admin.toml")));
    }

    #[test]
    fn test_missing_arguments_message() {
        let err = missing_arguments(&["username", "password"]);
        assert_eq!(
            err.to_string(),
            "Not enough arguments (missing: \"username, password\")."
        );
    }
}
