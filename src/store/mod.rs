//! Identity storage collaborator.
//!
//! The core never mutates identities directly; it goes through [`UserStore`].
//! Uniqueness (case-insensitive email) and atomic updates are the store's
//! responsibility. The server binary uses the Postgres store; tests and local
//! development use the in-memory store.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// A stored identity.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<i64>,
}

/// Fields for creating an identity. The email must already be normalized
/// and the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    /// Apply all fields of `update` atomically; an email collision must
    /// leave the record untouched.
    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError>;
    async fn record_login(&self, id: Uuid, at: i64) -> Result<(), StoreError>;
}

/// Normalize an email for storage, lookup, and uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
