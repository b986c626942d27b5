//! create command - adds a user account

use std::io::Write;

use clap::Args;

use crate::cli::missing_arguments;
use crate::cli::prompt::{ask_until_valid, Prompter, Question};
use crate::config::AppConfig;
use crate::domain::user::{validate_password, validate_username, UserRepository, ROLE_DEFAULT};
use crate::infrastructure::user::{CreateUserRequest, PasswordEncoder, UserManager};

/// Arguments for the create command
#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// The username
    pub username: Option<String>,

    /// The password
    pub password: Option<String>,

    /// Role to grant, repeatable (defaults to ROLE_USER)
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Grant the super-admin role
    #[arg(long)]
    pub super_admin: bool,

    /// Create the user disabled
    #[arg(long)]
    pub inactive: bool,
}

impl CreateArgs {
    fn into_request(self, super_admin_role: &str) -> anyhow::Result<CreateUserRequest> {
        let mut missing = Vec::new();
        if self.username.as_deref().is_none_or(str::is_empty) {
            missing.push("username");
        }
        if self.password.as_deref().is_none_or(str::is_empty) {
            missing.push("password");
        }
        if !missing.is_empty() {
            return Err(missing_arguments(&missing));
        }

        let mut roles = self.roles;
        if roles.is_empty() {
            roles.push(ROLE_DEFAULT.to_string());
        }
        if self.super_admin {
            roles.push(super_admin_role.to_string());
        }

        Ok(CreateUserRequest {
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            roles,
            enabled: !self.inactive,
        })
    }
}

/// Ask for whichever of username and password is missing
pub fn interact(args: &mut CreateArgs, prompter: &mut dyn Prompter) -> anyhow::Result<()> {
    if args.username.as_deref().is_none_or(str::is_empty) {
        args.username = Some(ask_until_valid(
            prompter,
            &Question::new("Please choose a username:"),
            validate_username,
        )?);
    }

    if args.password.as_deref().is_none_or(str::is_empty) {
        args.password = Some(ask_until_valid(
            prompter,
            &Question::new("Please choose a password:").hidden(),
            validate_password,
        )?);
    }

    Ok(())
}

pub async fn run<R, H>(
    manager: &UserManager<R, H>,
    config: &AppConfig,
    mut args: CreateArgs,
    prompter: Option<&mut dyn Prompter>,
    out: &mut dyn Write,
) -> anyhow::Result<()>
where
    R: UserRepository + ?Sized,
    H: PasswordEncoder,
{
    if let Some(prompter) = prompter {
        interact(&mut args, prompter)?;
    }

    let request = args.into_request(&config.security.super_admin_role)?;
    let user = manager.create_user(request).await?;

    writeln!(out, "Created user {}", user.username())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cli::prompt::scripted::ScriptedPrompter;
    use crate::domain::DomainError;
    use crate::infrastructure::user::{Argon2Encoder, InMemoryUserRepository};

    fn manager() -> UserManager<InMemoryUserRepository, Argon2Encoder> {
        let encoder = Argon2Encoder::with_params(1024, 1, 1).unwrap();
        UserManager::new(Arc::new(InMemoryUserRepository::new()), Arc::new(encoder))
    }

    fn args(username: &str, password: &str) -> CreateArgs {
        CreateArgs {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_with_default_role() {
        let manager = manager();
        let mut out = Vec::new();

        run(&manager, &AppConfig::default(), args("matthieu", "pw"), None, &mut out)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Created user matthieu\n");
        let user = manager.require_user("matthieu").await.unwrap();
        assert_eq!(user.roles(), [ROLE_DEFAULT]);
        assert!(user.is_enabled());
        assert!(manager.encoder().verify("pw", user.password_hash()));
    }

    #[tokio::test]
    async fn test_create_super_admin_inactive() {
        let manager = manager();
        let mut out = Vec::new();
        let mut create = args("root", "pw");
        create.roles = vec!["ROLE_ADMIN".to_string()];
        create.super_admin = true;
        create.inactive = true;

        run(&manager, &AppConfig::default(), create, None, &mut out)
            .await
            .unwrap();

        let user = manager.require_user("root").await.unwrap();
        assert_eq!(user.roles(), ["ROLE_ADMIN", "ROLE_SUPER_ADMIN"]);
        assert!(!user.is_enabled());
    }

    #[tokio::test]
    async fn test_super_admin_flag_with_explicit_role() {
        let manager = manager();
        let mut out = Vec::new();
        let mut create = args("root", "pw");
        create.roles = vec!["ROLE_SUPER_ADMIN".to_string()];
        create.super_admin = true;

        run(&manager, &AppConfig::default(), create, None, &mut out)
            .await
            .unwrap();

        let user = manager.require_user("root").await.unwrap();
        assert_eq!(user.roles(), ["ROLE_SUPER_ADMIN"]);
    }

    #[tokio::test]
    async fn test_prompts_for_missing_values() {
        let manager = manager();
        let mut prompter = ScriptedPrompter::new(["x", "matthieu", "", "pw"]);
        let mut out = Vec::new();

        run(
            &manager,
            &AppConfig::default(),
            CreateArgs::default(),
            Some(&mut prompter),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(prompter.rejections.len(), 2);
        assert!(prompter.asked[3].hidden);
        assert!(manager.require_user("matthieu").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_values_without_interaction() {
        let manager = manager();
        let mut out = Vec::new();

        let err = run(&manager, &AppConfig::default(), CreateArgs::default(), None, &mut out)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Not enough arguments (missing: \"username, password\")."
        );
    }

    #[tokio::test]
    async fn test_duplicate_user_is_conflict() {
        let manager = manager();
        let mut out = Vec::new();

        run(&manager, &AppConfig::default(), args("matthieu", "pw"), None, &mut out)
            .await
            .unwrap();
        let err = run(&manager, &AppConfig::default(), args("matthieu", "pw"), None, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Conflict { .. })
        ));
    }
}
