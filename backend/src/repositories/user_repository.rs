//! Database repository for principal management operations.
//!
//! Provides CRUD operations for user accounts. Write operations are generic
//! over the executor so the hierarchy service can run them inside a single
//! transaction.

use crate::database::models::{CreateUser, User};
use anyhow::Result;
use sqlx::{Executor, Sqlite, SqlitePool};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role_id, is_active, created_by, created_at, updated_at";

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity, maintaining the
/// relationship with roles.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        Self::create(self.pool, user).await
    }

    /// Inserts a user row through an arbitrary executor (pool or open
    /// transaction).
    pub async fn create<'e, E>(executor: E, user: CreateUser) -> Result<User>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role_id, is_active, created_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role_id)
        .bind(true)
        .bind(&user.created_by)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    /// Retrieves a user by their unique identifier.
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Self::get_by_id(self.pool, id).await
    }

    pub async fn get_by_id<'e, E>(executor: E, id: &str) -> Result<Option<User>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Checks if an email already exists in the system.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
                .bind(email)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Flips the active flag, returning the updated row when it exists.
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_active = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(is_active)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Hard-deletes a user row, returning the number of rows removed.
    pub async fn delete<'e, E>(executor: E, id: &str) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
