//! Role token validation

use thiserror::Error;

/// Errors that can occur during role validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoleValidationError {
    #[error("Role cannot be empty")]
    Empty,

    #[error("Role '{0}' exceeds maximum length of {1} characters")]
    TooLong(String, usize),

    #[error("Role '{0}' must start with a letter")]
    InvalidStart(String),

    #[error("Role '{0}' contains invalid character: '{1}'. Only uppercase letters, digits, and underscores are allowed")]
    InvalidCharacter(String, char),
}

const MAX_ROLE_LENGTH: usize = 64;

/// Validate a role token such as `ROLE_ADMIN`
pub fn validate_role(role: &str) -> Result<(), RoleValidationError> {
    if role.is_empty() {
        return Err(RoleValidationError::Empty);
    }

    if role.len() > MAX_ROLE_LENGTH {
        return Err(RoleValidationError::TooLong(role.to_string(), MAX_ROLE_LENGTH));
    }

    if !role.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Err(RoleValidationError::InvalidStart(role.to_string()));
    }

    if let Some(c) = role
        .chars()
        .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit() && *c != '_')
    {
        return Err(RoleValidationError::InvalidCharacter(role.to_string(), c));
    }

    Ok(())
}

/// Validate every role of a list, stopping at the first failure
pub fn validate_roles<S: AsRef<str>>(roles: &[S]) -> Result<(), RoleValidationError> {
    roles.iter().try_for_each(|role| validate_role(role.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_roles() {
        assert!(validate_role("ROLE_USER").is_ok());
        assert!(validate_role("ROLE_BLOG_ADMIN").is_ok());
        assert!(validate_role("ROLE_LEVEL_2").is_ok());
    }

    #[test]
    fn test_empty_role() {
        assert_eq!(validate_role(""), Err(RoleValidationError::Empty));
    }

    #[test]
    fn test_role_too_long() {
        let role = format!("ROLE_{}", "A".repeat(60));
        assert!(matches!(
            validate_role(&role),
            Err(RoleValidationError::TooLong(_, 64))
        ));
    }

    #[test]
    fn test_role_invalid_start() {
        assert_eq!(
            validate_role("_ROLE"),
            Err(RoleValidationError::InvalidStart("_ROLE".to_string()))
        );
    }

    #[test]
    fn test_role_lowercase_rejected() {
        assert_eq!(
            validate_role("ROLE_admin"),
            Err(RoleValidationError::InvalidCharacter(
                "ROLE_admin".to_string(),
                'a'
            ))
        );
    }

    #[test]
    fn test_validate_roles_list() {
        assert!(validate_roles(&["ROLE_USER", "ROLE_ADMIN"]).is_ok());
        assert!(validate_roles::<&str>(&[]).is_ok());
        assert!(validate_roles(&["ROLE_USER", "bad role"]).is_err());
    }
}
