//! Database repository for the creator-ownership mapping tables.
//!
//! The edges live in `admin_tutors` and `tutor_students`, keyed by the
//! creator's id, so they can be resolved and removed without touching the
//! principal rows. Everything here is generic over the executor: the
//! hierarchy service runs the multi-statement flows (owned-principal
//! creation, cascade delete) inside a single transaction.

use anyhow::Result;
use sqlx::{Executor, Sqlite, SqlitePool};

/// Repository for ownership-edge database operations.
pub struct HierarchyRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> HierarchyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolves the tutors owned by an admin.
    pub async fn tutor_ids_for_admin(&self, admin_id: &str) -> Result<Vec<String>> {
        Self::tutor_ids(self.pool, admin_id).await
    }

    /// Resolves the students owned by a tutor.
    pub async fn student_ids_for_tutor(&self, tutor_id: &str) -> Result<Vec<String>> {
        Self::student_ids(self.pool, tutor_id).await
    }

    pub async fn link_admin_tutor<'e, E>(executor: E, admin_id: &str, tutor_id: &str) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO admin_tutors (admin_id, tutor_id) VALUES (?, ?)")
            .bind(admin_id)
            .bind(tutor_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn link_tutor_student<'e, E>(
        executor: E,
        tutor_id: &str,
        student_id: &str,
    ) -> Result<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("INSERT INTO tutor_students (tutor_id, student_id) VALUES (?, ?)")
            .bind(tutor_id)
            .bind(student_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn tutor_ids<'e, E>(executor: E, admin_id: &str) -> Result<Vec<String>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT tutor_id FROM admin_tutors WHERE admin_id = ? ORDER BY created_at",
        )
        .bind(admin_id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    pub async fn student_ids<'e, E>(executor: E, tutor_id: &str) -> Result<Vec<String>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT student_id FROM tutor_students WHERE tutor_id = ? ORDER BY created_at",
        )
        .bind(tutor_id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    /// Removes the inbound edge of an owned tutor (admin_tutors row keyed by
    /// the tutor side).
    pub async fn unlink_tutor<'e, E>(executor: E, tutor_id: &str) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM admin_tutors WHERE tutor_id = ?")
            .bind(tutor_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes the inbound edge of an owned student.
    pub async fn unlink_student<'e, E>(executor: E, student_id: &str) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tutor_students WHERE student_id = ?")
            .bind(student_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes every outbound edge a tutor owns.
    pub async fn unlink_students_of_tutor<'e, E>(executor: E, tutor_id: &str) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tutor_students WHERE tutor_id = ?")
            .bind(tutor_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes every outbound edge an admin owns.
    pub async fn unlink_tutors_of_admin<'e, E>(executor: E, admin_id: &str) -> Result<u64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM admin_tutors WHERE admin_id = ?")
            .bind(admin_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
