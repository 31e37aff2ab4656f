//! Postgres-backed identity store.

use super::{normalize_email, NewUser, StoreError, User, UserStore, UserUpdate};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        is_staff BOOLEAN NOT NULL DEFAULT FALSE,
        is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
        last_login BIGINT
    )
";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensure the `users` table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema statement fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to create users table")?;
        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        is_active: row.get("is_active"),
        is_staff: row.get("is_staff"),
        is_superuser: row.get("is_superuser"),
        last_login: row.get("last_login"),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, \
     is_active, is_staff, is_superuser, last_login";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up user by email")?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 LIMIT 1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up user by id")?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(normalize_email(&new_user.email))
            .bind(&new_user.password_hash)
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateEmail
                } else {
                    StoreError::Backend(anyhow::Error::new(err).context("Failed to create user"))
                }
            })?;
        Ok(user_from_row(&row))
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
        // COALESCE applies the whole update in one statement, so an email
        // collision rolls everything back.
        let query = format!(
            "UPDATE users SET \
                email = COALESCE($1, email), \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                password_hash = COALESCE($4, password_hash) \
             WHERE id = $5 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(update.email.as_deref().map(normalize_email))
            .bind(update.first_name)
            .bind(update.last_name)
            .bind(update.password_hash)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateEmail
                } else {
                    StoreError::Backend(anyhow::Error::new(err).context("Failed to update user"))
                }
            })?;
        row.as_ref().map(user_from_row).ok_or(StoreError::NotFound)
    }

    async fn record_login(&self, id: Uuid, at: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to record login")?;
        Ok(())
    }
}
