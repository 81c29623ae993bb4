use std::path::PathBuf;
use std::sync::Arc;

use tokio::{fs, sync::Mutex};

use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload};
use crate::error::{Error, Result};
use crate::models::user::{Role, User, UserFile};
use crate::utils::crypto::{hash_password, verify_password};

const DEFAULT_PASSWORD: &str = "changeme";

/// Users kept in a JSON file. A missing file is seeded with `admin`/`admin`.
#[derive(Clone)]
pub struct UserService {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl UserService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Result<UserFile> {
        match fs::read(self.path.as_ref()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut file = UserFile::default();
                file.users.insert(
                    "admin".to_string(),
                    User {
                        username: "admin".to_string(),
                        name: "Administrator".to_string(),
                        email: String::new(),
                        role: Role::Admin,
                        password_hash: hash_password("admin")?,
                    },
                );
                self.save(&file).await?;
                tracing::info!(path = %self.path.display(), "Seeded user store with default admin");
                Ok(file)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, file: &UserFile) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, self.path.as_ref()).await?;
        Ok(())
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let _guard = self.lock.lock().await;
        let file = self.load().await?;
        match file.users.get(username.trim()) {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user.clone()),
            _ => {
                tracing::warn!(username, "Failed sign-in");
                Err(Error::Unauthorized("Invalid credentials".into()))
            }
        }
    }

    pub async fn get(&self, username: &str) -> Result<Option<User>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.users.get(username).cloned())
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let _guard = self.lock.lock().await;
        let mut users: Vec<User> = self.load().await?.users.into_values().collect();
        users.sort_by_key(|u| u.username.to_lowercase());
        Ok(users)
    }

    pub async fn requestors(&self) -> Result<Vec<User>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|u| u.role == Role::Requestor)
            .collect())
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        let username = payload.username.trim().to_string();
        if username.is_empty() || file.users.contains_key(&username) {
            return Err(Error::BadRequest("Username exists / invalid".into()));
        }

        let role = payload
            .role
            .as_deref()
            .and_then(Role::parse)
            .unwrap_or(Role::Requestor);
        let password = payload
            .password
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PASSWORD.to_string());

        let user = User {
            username: username.clone(),
            name: payload.name.trim().to_string(),
            email: payload.email.unwrap_or_default().trim().to_string(),
            role,
            password_hash: hash_password(&password)?,
        };
        file.users.insert(username.clone(), user.clone());
        self.save(&file).await?;
        tracing::info!(username = %username, role = %role, "User created");
        Ok(user)
    }

    pub async fn update(&self, username: &str, payload: UpdateUserPayload) -> Result<User> {
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        let user = file
            .users
            .get_mut(username)
            .ok_or_else(|| Error::NotFound(format!("User {} not found", username)))?;

        user.name = payload.name.trim().to_string();
        user.email = payload.email.unwrap_or_default().trim().to_string();
        if let Some(role) = payload.role.as_deref().and_then(Role::parse) {
            user.role = role;
        }
        if let Some(password) = payload.password.filter(|p| !p.trim().is_empty()) {
            user.password_hash = hash_password(password.trim())?;
        }
        let updated = user.clone();
        self.save(&file).await?;
        tracing::info!(username, "User updated");
        Ok(updated)
    }

    pub async fn delete(&self, username: &str, acting_user: &str) -> Result<()> {
        if username == acting_user {
            return Err(Error::BadRequest("Cannot delete yourself".into()));
        }
        let _guard = self.lock.lock().await;
        let mut file = self.load().await?;
        if file.users.remove(username).is_none() {
            return Err(Error::NotFound(format!("User {} not found", username)));
        }
        self.save(&file).await?;
        tracing::info!(username, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(username: &str, role: Option<&str>, password: Option<&str>) -> CreateUserPayload {
        CreateUserPayload {
            username: username.into(),
            name: "Someone".into(),
            email: None,
            role: role.map(Into::into),
            password: password.map(Into::into),
        }
    }

    #[tokio::test]
    async fn missing_store_is_seeded_with_admin() {
        let dir = tempfile::tempdir().unwrap();
        let users = UserService::new(dir.path().join("users.json"));
        let admin = users.authenticate("admin", "admin").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(dir.path().join("users.json").exists());
        assert!(users.authenticate("admin", "wrong").await.is_err());
    }

    #[tokio::test]
    async fn create_applies_defaults_and_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let users = UserService::new(dir.path().join("users.json"));
        let created = users.create(payload("sam", Some("boss"), None)).await.unwrap();
        assert_eq!(created.role, Role::Requestor);
        assert!(users.authenticate("sam", DEFAULT_PASSWORD).await.is_ok());
        assert!(users.create(payload("sam", None, None)).await.is_err());
        assert_eq!(users.requestors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cannot_delete_self() {
        let dir = tempfile::tempdir().unwrap();
        let users = UserService::new(dir.path().join("users.json"));
        assert!(users.delete("admin", "admin").await.is_err());
        users.create(payload("hr1", Some("hr"), Some("pw"))).await.unwrap();
        users.delete("hr1", "admin").await.unwrap();
        assert!(users.get("hr1").await.unwrap().is_none());
    }
}
