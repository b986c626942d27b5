//! JSON file user repository implementation
//!
//! The whole store lives in one JSON document. Every write rewrites the file
//! through a sibling temp file followed by a rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserDocument {
    #[serde(default)]
    users: Vec<User>,
}

/// File-backed implementation of UserRepository
#[derive(Debug)]
pub struct JsonFileUserRepository {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeMap<String, User>, DomainError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "User store does not exist yet");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let document: UserDocument = serde_json::from_slice(&contents).map_err(|e| {
            DomainError::storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        Ok(document
            .users
            .into_iter()
            .map(|user| (user.username().to_string(), user))
            .collect())
    }

    async fn persist(&self, users: BTreeMap<String, User>) -> Result<(), DomainError> {
        let document = UserDocument {
            users: users.into_values().collect(),
        };

        let contents = serde_json::to_vec_pretty(&document)
            .map_err(|e| DomainError::storage(format!("Failed to serialize users: {}", e)))?;

        write_replacing(&self.path, contents).await?;

        debug!(path = %self.path.display(), "User store written");

        Ok(())
    }
}

/// Write `contents` next to `path` and rename the result over it
///
/// The temp file is removed again when the rename fails.
async fn write_replacing(path: &Path, contents: Vec<u8>) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
        DomainError::storage(format!("Failed to write {}: {}", tmp_path.display(), e))
    })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(DomainError::storage(format!(
            "Failed to replace {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let mut users = self.load().await?;
        Ok(users.remove(username))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;

        if users.contains_key(user.username()) {
            return Err(DomainError::conflict(format!(
                "Username '{}' already exists",
                user.username()
            )));
        }

        users.insert(user.username().to_string(), user.clone());
        self.persist(users).await?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load().await?;

        match users.get_mut(user.username()) {
            Some(stored) => *stored = user.clone(),
            None => return Err(DomainError::user_not_found(user.username())),
        }

        self.persist(users).await?;

        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.load().await?.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(username: &str) -> User {
        User::new(username, vec!["ROLE_USER".to_string()])
    }

    fn repository(dir: &tempfile::TempDir) -> JsonFileUserRepository {
        JsonFileUserRepository::new(dir.path().join("data").join("users.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.get_by_username("anyone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let mut user = create_test_user("matthieu");
        user.set_password_hash("$argon2id$stored");
        repository(&dir).create(user).await.unwrap();

        let reopened = repository(&dir);
        let stored = reopened.get_by_username("matthieu").await.unwrap().unwrap();
        assert_eq!(stored.password_hash(), "$argon2id$stored");
        assert_eq!(stored.roles(), ["ROLE_USER"]);
        assert!(!dir.path().join("data").join("users.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        repo.create(create_test_user("matthieu")).await.unwrap();

        let result = repo.create(create_test_user("matthieu")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        let mut user = create_test_user("matthieu");

        repo.create(user.clone()).await.unwrap();
        repo.create(create_test_user("other")).await.unwrap();

        user.set_roles(vec!["ROLE_ADMIN".to_string()]);
        repo.update(&user).await.unwrap();

        let stored = repo.get_by_username("matthieu").await.unwrap().unwrap();
        assert_eq!(stored.roles(), ["ROLE_ADMIN"]);
        assert_eq!(repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        let result = repo.update(&create_test_user("ghost")).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, b"not json").unwrap();

        let repo = JsonFileUserRepository::new(&path);
        let result = repo.list().await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_failed_replace_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("users.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), b"x").unwrap();

        let result = write_replacing(&target, b"{}".to_vec()).await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(!dir.path().join("users.json.tmp").exists());
    }
}
