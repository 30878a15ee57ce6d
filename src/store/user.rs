use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use crate::errors::StoreError;
use crate::models::user::UserModel;

/// Id -> user, exactly as laid out on disk.
pub type UserTable = BTreeMap<String, UserModel>;

/// Users persisted in a single JSON file, read and rewritten whole on every call.
#[derive(Clone, Debug)]
pub struct UserRepository {
    path: Arc<PathBuf>,
    // Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl UserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty table.
    pub async fn load_users(&self) -> Result<UserTable, StoreError> {
        match tokio::fs::read(self.path.as_path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(UserTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file contents with `users`, via a temporary sibling and a rename.
    pub async fn save_users(&self, users: &UserTable) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(users)?;
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, self.path.as_path()).await?;
        Ok(())
    }

    #[instrument(name = "Saving new user to the user file", skip(self, password_hash))]
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserModel, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load_users().await?;

        if users.values().any(|user| user.username == username) {
            tracing::warn!("Username is already registered");
            return Err(StoreError::UsernameTaken);
        }

        let id = next_id(&users)?;
        let user = UserModel {
            id: id.clone(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.insert(id, user.clone());

        self.save_users(&users).await.map_err(|e| {
            tracing::error!("Failed to write user file: {:?}", e);
            e
        })?;
        Ok(user)
    }

    #[instrument(name = "Fetching user by username", skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, StoreError> {
        let users = self.load_users().await?;
        Ok(users.into_values().find(|user| user.username == username))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserModel>, StoreError> {
        let mut users = self.load_users().await?;
        Ok(users.remove(id))
    }
}

/// One past the largest numeric id, starting from "1".
fn next_id(users: &UserTable) -> Result<String, StoreError> {
    let mut max = 0u64;
    for id in users.keys() {
        let n: u64 = id.parse().map_err(|_| StoreError::CorruptId(id.clone()))?;
        max = max.max(n);
    }
    // Fails only once an id has reached u64::MAX.
    let next = max
        .checked_add(1)
        .ok_or_else(|| StoreError::CorruptId(max.to_string()))?;
    Ok(next.to_string())
}
