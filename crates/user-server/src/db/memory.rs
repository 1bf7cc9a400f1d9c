use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use user_shared::User;
use uuid::Uuid;

use super::{StoreError, UserStore};

const EMAIL_KEY: &str = "users_email_key";

/// In-process store with the same contract as the Postgres one.
///
/// Records are kept in insertion order; the write lock makes the uniqueness
/// check and the write a single step.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut listed: Vec<User> = users.iter().rev().cloned().collect();
        // Stable: ties keep the newest insertion first.
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, name: &str, email: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate {
                key: EMAIL_KEY.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn update(&self, id: Uuid, name: &str, email: &str) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(index) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        if users.iter().any(|u| u.id != id && u.email == email) {
            return Err(StoreError::Duplicate {
                key: EMAIL_KEY.to_string(),
            });
        }

        let user = &mut users[index];
        user.name = name.to_string();
        user.email = email.to_string();
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
