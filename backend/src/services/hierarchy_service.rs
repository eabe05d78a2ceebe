//! Creator-ownership hierarchy business logic.
//!
//! Admins provision tutors, tutors provision students; the resulting edges
//! drive owned-principal listing and cascade deletion. Subordinate creation
//! and cascades each run in a single transaction, so a failure anywhere in
//! the tree leaves the store untouched.

use crate::database::models::{CreateSubordinate, CreateUser, RoleName, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::hierarchy_repository::HierarchyRepository;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use crate::utils::jwt::TokenClaims;
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Row counts reported after a deletion.
///
/// Cascade always removes children before the parent row, so when a count is
/// present it reflects fully deleted subtrees.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOutcome {
    pub deleted_self: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_tutors: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_students: Option<u64>,
}

pub struct HierarchyService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> HierarchyService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a subordinate account and its ownership edge in one
    /// transaction; either both commit or neither does.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures, a creator/subordinate
    /// role pairing outside admin→tutor / tutor→student, and duplicate
    /// emails.
    pub async fn create_owned_principal(
        &self,
        creator: &TokenClaims,
        data: CreateSubordinate,
        subordinate_role: RoleName,
    ) -> ServiceResult<User> {
        if let Err(validation_errors) = data.validate() {
            return Err(ServiceError::from_validation(validation_errors));
        }

        match (creator.role, subordinate_role) {
            (RoleName::Admin | RoleName::Superadmin, RoleName::Tutor) => {}
            (RoleName::Tutor, RoleName::Student) => {}
            _ => {
                return Err(ServiceError::permission_denied(format!(
                    "Role {} cannot create {} accounts",
                    creator.role, subordinate_role
                )));
            }
        }

        let user_repo = UserRepository::new(self.pool);
        if user_repo.email_exists(&data.email).await? {
            return Err(ServiceError::already_exists("User", &data.email));
        }

        let role_repo = RoleRepository::new(self.pool);
        let role = role_repo
            .get_role_by_name(subordinate_role)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", subordinate_role.as_str()))?;

        let password_hash = UserService::hash_password(&data.password)?;
        let create = CreateUser {
            id: Uuid::now_v7().to_string(),
            name: data.name,
            email: data.email,
            password_hash,
            role_id: role.id,
            created_by: Some(creator.sub.clone()),
        };

        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;

        let user = UserRepository::create(&mut *tx, create).await?;
        match subordinate_role {
            RoleName::Tutor => {
                HierarchyRepository::link_admin_tutor(&mut *tx, &creator.sub, &user.id).await?
            }
            RoleName::Student => {
                HierarchyRepository::link_tutor_student(&mut *tx, &creator.sub, &user.id).await?
            }
            _ => unreachable!("pairing validated above"),
        }

        tx.commit().await.map_err(anyhow::Error::from)?;

        tracing::info!(
            creator = %creator.sub,
            subordinate = %user.id,
            role = %subordinate_role,
            "Created owned principal"
        );

        Ok(user)
    }

    /// Resolves every ownership edge for `owner_id` and fetches the matching
    /// principal rows. No edges is an empty list, not an error.
    pub async fn list_owned(
        &self,
        owner_id: &str,
        owned_role: RoleName,
    ) -> ServiceResult<Vec<User>> {
        let hierarchy_repo = HierarchyRepository::new(self.pool);
        let ids = match owned_role {
            RoleName::Tutor => hierarchy_repo.tutor_ids_for_admin(owner_id).await?,
            RoleName::Student => hierarchy_repo.student_ids_for_tutor(owner_id).await?,
            _ => {
                return Err(ServiceError::invalid_operation(format!(
                    "Role {} is never owned",
                    owned_role
                )));
            }
        };

        let user_repo = UserRepository::new(self.pool);
        let mut owned = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = user_repo.get_user_by_id(&id).await? {
                owned.push(user);
            }
        }

        Ok(owned)
    }

    /// Role-dependent cascade delete, in one transaction.
    ///
    /// Children go before parents (students before their tutor, tutors
    /// before their admin), and edges are removed at each level. Deletion
    /// never cascades upward. The caller is responsible for the
    /// "active principals are never deleted" precondition; this operation is
    /// unconditional.
    pub async fn delete_cascade(&self, principal_id: &str) -> ServiceResult<CascadeOutcome> {
        let user_service = UserService::new(self.pool);
        let user = user_service.get_user_required(principal_id).await?;
        let role = user_service.role_for_user(&user).await?;

        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;

        let outcome = match role.name {
            RoleName::Student => {
                HierarchyRepository::unlink_student(&mut *tx, &user.id).await?;
                let deleted_self = UserRepository::delete(&mut *tx, &user.id).await?;
                CascadeOutcome {
                    deleted_self,
                    deleted_tutors: None,
                    deleted_students: None,
                }
            }
            RoleName::Tutor => {
                let deleted_students = Self::delete_students_of(&mut tx, &user.id).await?;
                HierarchyRepository::unlink_tutor(&mut *tx, &user.id).await?;
                let deleted_self = UserRepository::delete(&mut *tx, &user.id).await?;
                CascadeOutcome {
                    deleted_self,
                    deleted_tutors: None,
                    deleted_students: Some(deleted_students),
                }
            }
            RoleName::Admin | RoleName::Superadmin => {
                let tutor_ids = HierarchyRepository::tutor_ids(&mut *tx, &user.id).await?;

                let mut deleted_students = 0;
                let mut deleted_tutors = 0;
                for tutor_id in &tutor_ids {
                    deleted_students += Self::delete_students_of(&mut tx, tutor_id).await?;
                    HierarchyRepository::unlink_tutor(&mut *tx, tutor_id).await?;
                    deleted_tutors += UserRepository::delete(&mut *tx, tutor_id).await?;
                }

                HierarchyRepository::unlink_tutors_of_admin(&mut *tx, &user.id).await?;
                let deleted_self = UserRepository::delete(&mut *tx, &user.id).await?;
                CascadeOutcome {
                    deleted_self,
                    deleted_tutors: Some(deleted_tutors),
                    deleted_students: Some(deleted_students),
                }
            }
        };

        tx.commit().await.map_err(anyhow::Error::from)?;

        tracing::info!(principal = %principal_id, role = %role.name, ?outcome, "Cascade delete");

        Ok(outcome)
    }

    /// Deletes exactly one principal row plus the edges touching it, leaving
    /// any subordinate rows orphaned. Explicit alternative to
    /// [`Self::delete_cascade`], never the default.
    pub async fn delete_self_only(&self, principal_id: &str) -> ServiceResult<CascadeOutcome> {
        let user_service = UserService::new(self.pool);
        let user = user_service.get_user_required(principal_id).await?;

        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;

        HierarchyRepository::unlink_student(&mut *tx, &user.id).await?;
        HierarchyRepository::unlink_tutor(&mut *tx, &user.id).await?;
        HierarchyRepository::unlink_students_of_tutor(&mut *tx, &user.id).await?;
        HierarchyRepository::unlink_tutors_of_admin(&mut *tx, &user.id).await?;
        let deleted_self = UserRepository::delete(&mut *tx, &user.id).await?;

        tx.commit().await.map_err(anyhow::Error::from)?;

        Ok(CascadeOutcome {
            deleted_self,
            deleted_tutors: None,
            deleted_students: None,
        })
    }

    /// Removes a tutor's owned students, edges first, then rows.
    async fn delete_students_of(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        tutor_id: &str,
    ) -> ServiceResult<u64> {
        let student_ids = HierarchyRepository::student_ids(&mut **tx, tutor_id).await?;

        let mut deleted = 0;
        for student_id in &student_ids {
            HierarchyRepository::unlink_student(&mut **tx, student_id).await?;
            deleted += UserRepository::delete(&mut **tx, student_id).await?;
        }

        Ok(deleted)
    }
}
