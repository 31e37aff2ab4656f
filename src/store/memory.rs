//! In-memory identity store for tests and local development.

use super::{normalize_email, NewUser, StoreError, User, UserStore, UserUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let wanted = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == wanted).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&new_user.email);
        let mut users = self.users.write().await;
        if users.values().any(|user| user.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let email = update.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            // Uniqueness check before any mutation keeps the update atomic.
            if users
                .values()
                .any(|user| user.id != id && user.email == *email)
            {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }
        Ok(user.clone())
    }

    async fn record_login(&self, id: Uuid, at: i64) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.last_login = Some(at);
        Ok(())
    }
}
