//! User entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to every authenticated user
pub const ROLE_DEFAULT: &str = "ROLE_USER";

/// User account as held by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, immutable login name
    username: String,
    /// Encoded password hash
    password_hash: String,
    /// Plaintext password waiting to be encoded on the next save
    #[serde(skip)]
    plain_password: Option<String>,
    /// Role tokens, e.g. `ROLE_ADMIN`
    #[serde(default)]
    roles: Vec<String>,
    /// Whether the account may log in
    #[serde(default = "default_enabled")]
    enabled: bool,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

impl User {
    /// Create a new enabled user without a password
    pub fn new(username: impl Into<String>, roles: Vec<String>) -> Self {
        let now = Utc::now();

        Self {
            username: username.into(),
            password_hash: String::new(),
            plain_password: None,
            roles,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored fields
    pub fn restore(
        username: String,
        password_hash: String,
        roles: Vec<String>,
        enabled: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            password_hash,
            plain_password: None,
            roles,
            enabled,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn plain_password(&self) -> Option<&str> {
        self.plain_password.as_deref()
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check whether the user holds a role directly
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    // Mutators

    /// Assign a new plaintext password; it is encoded when the user is saved
    pub fn set_plain_password(&mut self, password: impl Into<String>) {
        self.plain_password = Some(password.into());
        self.touch();
    }

    /// Take the pending plaintext password, leaving none behind
    pub fn take_plain_password(&mut self) -> Option<String> {
        self.plain_password.take()
    }

    /// Replace the encoded password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Replace the full role list
    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
        self.touch();
    }

    /// Add a role unless already present
    pub fn add_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if !self.has_role(&role) {
            self.roles.push(role);
            self.touch();
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(username: &str) -> User {
        User::new(username, vec![ROLE_DEFAULT.to_string()])
    }

    #[test]
    fn test_user_creation() {
        let user = create_test_user("matthieu");

        assert_eq!(user.username(), "matthieu");
        assert_eq!(user.password_hash(), "");
        assert!(user.plain_password().is_none());
        assert!(user.is_enabled());
        assert!(user.has_role(ROLE_DEFAULT));
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_plain_password_is_taken_once() {
        let mut user = create_test_user("matthieu");

        user.set_plain_password("s3cret");
        assert_eq!(user.plain_password(), Some("s3cret"));

        assert_eq!(user.take_plain_password().as_deref(), Some("s3cret"));
        assert!(user.take_plain_password().is_none());
    }

    #[test]
    fn test_set_password_hash_touches() {
        let mut user = create_test_user("matthieu");
        let original_updated = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_password_hash("new_hash");
        assert_eq!(user.password_hash(), "new_hash");
        assert!(user.updated_at() > original_updated);
    }

    #[test]
    fn test_add_role_skips_duplicates() {
        let mut user = create_test_user("matthieu");

        user.add_role("ROLE_ADMIN");
        user.add_role("ROLE_ADMIN");
        user.add_role(ROLE_DEFAULT);

        assert_eq!(user.roles(), ["ROLE_USER", "ROLE_ADMIN"]);
    }

    #[test]
    fn test_set_roles_and_enabled() {
        let mut user = create_test_user("matthieu");

        user.set_roles(vec!["ROLE_EDITOR".to_string()]);
        user.set_enabled(false);

        assert_eq!(user.roles(), ["ROLE_EDITOR"]);
        assert!(!user.has_role(ROLE_DEFAULT));
        assert!(!user.is_enabled());
    }

    #[test]
    fn test_serialization_excludes_plain_password() {
        let mut user = create_test_user("matthieu");
        user.set_password_hash("$argon2id$hash");
        user.set_plain_password("plaintext_secret");

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("plaintext_secret"));
        assert!(json.contains("$argon2id$hash"));

        let restored: User = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.username(), "matthieu");
        assert!(restored.plain_password().is_none());
        assert_eq!(restored.roles(), user.roles());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "username": "legacy",
            "password_hash": "",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.roles().is_empty());
        assert!(user.is_enabled());
    }
}
