//! change-password command - sets a new password for an existing user

use std::io::Write;

use clap::Args;

use crate::cli::missing_arguments;
use crate::cli::prompt::{ask_until_valid, Prompter, Question};
use crate::domain::user::{validate_password, validate_username_present, UserRepository};
use crate::infrastructure::user::{PasswordEncoder, UserManager};

const USERNAME_QUESTION: &str = "Please give the username:";
const PASSWORD_QUESTION: &str = "Please enter the new password:";

/// Arguments for the change-password command
#[derive(Debug, Clone, Default, Args)]
#[command(after_help = "\
The change-password command changes the password of a user:

  user-admin change-password matthieu

This interactive shell will first ask you for a password.

You can alternatively specify the password as a second argument:

  user-admin change-password matthieu mypassword")]
pub struct ChangePasswordArgs {
    /// The username
    pub username: Option<String>,

    /// The password
    pub password: Option<String>,
}

/// Ask for whichever argument is missing or blank
pub fn interact(args: &mut ChangePasswordArgs, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    if username_missing(&args.username) {
        let username = ask_until_valid(
            prompter,
            &Question::new(USERNAME_QUESTION),
            validate_username_present,
        )?;
        args.username = Some(username.trim().to_string());
    }

    if password_missing(&args.password) {
        let password = ask_until_valid(
            prompter,
            &Question::new(PASSWORD_QUESTION).hidden(),
            validate_password,
        )?;
        args.password = Some(password);
    }

    Ok(())
}

/// Change the password and report it
pub async fn execute<R, H>(
    manager: &UserManager<R, H>,
    username: &str,
    password: &str,
    out: &mut dyn Write,
) -> anyhow::Result<()>
where
    R: UserRepository + ?Sized,
    H: PasswordEncoder,
{
    manager.change_password(username, password).await?;
    writeln!(out, "Changed password for user {}", username)?;

    Ok(())
}

/// Run the command, prompting first when a prompter is available
pub async fn run<R, H>(
    manager: &UserManager<R, H>,
    mut args: ChangePasswordArgs,
    prompter: Option<&mut dyn Prompter>,
    out: &mut dyn Write,
) -> anyhow::Result<()>
where
    R: UserRepository + ?Sized,
    H: PasswordEncoder,
{
    args.username = args.username.map(|username| username.trim().to_string());

    if let Some(prompter) = prompter {
        interact(&mut args, prompter)?;
    }

    let mut missing = Vec::new();
    if username_missing(&args.username) {
        missing.push("username");
    }
    if password_missing(&args.password) {
        missing.push("password");
    }

    match (args.username, args.password) {
        (Some(username), Some(password)) if missing.is_empty() => {
            execute(manager, &username, &password, out).await
        }
        _ => Err(missing_arguments(&missing)),
    }
}

fn username_missing(username: &Option<String>) -> bool {
    username
        .as_deref()
        .is_none_or(|username| validate_username_present(username).is_err())
}

fn password_missing(password: &Option<String>) -> bool {
    password.as_deref().is_none_or(str::is_empty)
}
