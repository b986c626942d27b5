//! User manager: lookup, persistence, and password changes

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::role::validate_roles;
use crate::domain::user::{
    validate_password, validate_username, validate_username_present, User, UserRepository,
};
use crate::domain::DomainError;

use super::password::PasswordEncoder;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
    pub enabled: bool,
}

/// Front door to the user store
///
/// Plain passwords set on a [`User`] are encoded here, on save, so callers
/// never handle hashes.
pub struct UserManager<R: UserRepository + ?Sized, H: PasswordEncoder> {
    repository: Arc<R>,
    encoder: Arc<H>,
}

impl<R: UserRepository + ?Sized, H: PasswordEncoder> UserManager<R, H> {
    /// Create a new user manager
    pub fn new(repository: Arc<R>, encoder: Arc<H>) -> Self {
        Self {
            repository,
            encoder,
        }
    }

    pub fn encoder(&self) -> &H {
        &self.encoder
    }

    /// Find a user by username
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_username(username).await
    }

    /// Find a user by username, failing when there is none
    pub async fn require_user(&self, username: &str) -> Result<User, DomainError> {
        self.find_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::user_not_found(username))
    }

    /// Persist changes to an existing user
    ///
    /// A pending plain password is encoded into the hash and then erased.
    pub async fn save(&self, mut user: User) -> Result<User, DomainError> {
        self.encode_pending_password(&mut user)?;
        self.repository.update(&user).await
    }

    /// Create a new user
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        validate_username(&request.username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_roles(&request.roles).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.username_exists(&request.username).await? {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        let mut user = User::new(&request.username, Vec::new());
        for role in request.roles {
            user.add_role(role);
        }
        user.set_enabled(request.enabled);
        user.set_plain_password(request.password);
        self.encode_pending_password(&mut user)?;

        let user = self.repository.create(user).await?;
        info!(username = %user.username(), "Created user");

        Ok(user)
    }

    /// Change the password of an existing user
    ///
    /// Fails with `NotFound` when the username does not resolve; nothing is
    /// written in that case.
    pub async fn change_password(&self, username: &str, password: &str) -> Result<User, DomainError> {
        validate_username_present(username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        let mut user = self.require_user(username).await?;
        user.set_plain_password(password);

        let user = self.save(user).await?;
        info!(username = %user.username(), "Changed password");

        Ok(user)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    fn encode_pending_password(&self, user: &mut User) -> Result<(), DomainError> {
        if let Some(plain) = user.take_plain_password() {
            let hash = self.encoder.encode(&plain)?;
            user.set_password_hash(hash);
            debug!(username = %user.username(), "Encoded new password");
        }

        Ok(())
    }
}
