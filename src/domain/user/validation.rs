//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username can not be empty")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username contains invalid character: '{0}'. Only alphanumeric characters, dots, at signs, underscores, and hyphens are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Password can not be empty")]
    EmptyPassword,
}

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 180;

/// Check that a username was given at all
///
/// This is the only rule applied when looking up an existing account.
pub fn validate_username_present(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    Ok(())
}

/// Validate a username for a new account
///
/// Rules:
/// - Cannot be empty
/// - Minimum 2 characters
/// - Maximum 180 characters
/// - Only alphanumeric characters, `.`, `@`, `_` and `-`
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    validate_username_present(username)?;

    let length = username.chars().count();

    if length < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if length > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_alphanumeric() && !matches!(c, '.' | '@' | '_' | '-') {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

/// Validate a new plaintext password
///
/// Strength rules belong to whoever issues the password; an empty value is
/// the only thing rejected here.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    Ok(())
}
