//! Database repository for role management operations.
//!
//! Provides read-only access to the seeded system roles with lookup by ID or
//! name and complete role listing.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::{Role, RoleName};

const ROLE_COLUMNS: &str = "id, name, created_at, updated_at";

/// Repository for role database operations.
pub struct RoleRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> RoleRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Retrieves a role by its unique identifier.
    pub async fn get_role_by_id(&self, id: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(role)
    }

    /// Retrieves a role row by its name.
    pub async fn get_role_by_name(&self, name: RoleName) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE name = ?"
        ))
        .bind(name.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(role)
    }

    /// Retrieves all roles in the system.
    pub async fn get_all_roles(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles"))
            .fetch_all(self.pool)
            .await?;

        Ok(roles)
    }
}
