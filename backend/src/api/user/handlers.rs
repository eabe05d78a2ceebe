//! Handler functions for user profile and hierarchy management endpoints.
//!
//! These functions process requests for user data and the creator hierarchy,
//! and delegate the business logic to `services`. The role gates run as
//! middleware before any handler here; the deletion preconditions
//! (no self-delete, target must be inactive) live in this layer so the
//! hierarchy service itself stays unconditional.

use crate::api::common::ApiError;
use crate::api::user::models::*;
use crate::auth::models::UserSummary;
use crate::database::models::{CreateSubordinate, Role, RoleName, User};
use crate::services::hierarchy_service::{CascadeOutcome, HierarchyService};
use crate::services::user_service::UserService;
use crate::utils::jwt::TokenClaims;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Returns the authenticated principal's own profile.
#[axum::debug_handler]
pub async fn get_profile(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<UserSummary>, ApiError> {
    let user_service = UserService::new(&pool);

    let user = user_service.get_user_required(&claims.sub).await?;
    let role = user_service.role_for_user(&user).await?;

    Ok(ResponseJson(UserSummary::from_user(&user, role.name)))
}

/// Admin provisions a tutor account owned by them.
#[axum::debug_handler]
pub async fn create_tutor(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateSubordinate>,
) -> Result<(StatusCode, ResponseJson<UserSummary>), ApiError> {
    let hierarchy_service = HierarchyService::new(&pool);

    let user = hierarchy_service
        .create_owned_principal(&claims, payload, RoleName::Tutor)
        .await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(UserSummary::from_user(&user, RoleName::Tutor)),
    ))
}

/// Lists the tutors owned by the authenticated admin.
#[axum::debug_handler]
pub async fn list_owned_tutors(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<Vec<UserSummary>>, ApiError> {
    let hierarchy_service = HierarchyService::new(&pool);

    let tutors = hierarchy_service
        .list_owned(&claims.sub, RoleName::Tutor)
        .await?;

    Ok(ResponseJson(summaries(&tutors, RoleName::Tutor)))
}

/// Tutor provisions a student account owned by them.
#[axum::debug_handler]
pub async fn create_student(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateSubordinate>,
) -> Result<(StatusCode, ResponseJson<UserSummary>), ApiError> {
    let hierarchy_service = HierarchyService::new(&pool);

    let user = hierarchy_service
        .create_owned_principal(&claims, payload, RoleName::Student)
        .await?;

    Ok((
        StatusCode::CREATED,
        ResponseJson(UserSummary::from_user(&user, RoleName::Student)),
    ))
}

/// Lists the students owned by the authenticated tutor.
#[axum::debug_handler]
pub async fn list_owned_students(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<Vec<UserSummary>>, ApiError> {
    let hierarchy_service = HierarchyService::new(&pool);

    let students = hierarchy_service
        .list_owned(&claims.sub, RoleName::Student)
        .await?;

    Ok(ResponseJson(summaries(&students, RoleName::Student)))
}

/// Activates or deactivates a principal. Deactivation is the required first
/// step before any deletion endpoint will touch the account.
#[axum::debug_handler]
pub async fn set_user_status(
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<ResponseJson<UserSummary>, ApiError> {
    let is_active = match payload.status.as_str() {
        "active" => true,
        "inactive" => false,
        other => {
            return Err(ApiError::invalid_operation(format!(
                "Unknown status '{}', expected 'active' or 'inactive'",
                other
            )));
        }
    };

    let user_service = UserService::new(&pool);
    let user = user_service.set_status(&id, is_active).await?;
    let role = user_service.role_for_user(&user).await?;

    Ok(ResponseJson(UserSummary::from_user(&user, role.name)))
}

/// Deletes a principal. The default is the role-dependent cascade through
/// everything the principal owns; `?strategy=self` deletes only the one row
/// and leaves subordinates orphaned.
#[axum::debug_handler]
pub async fn delete_user(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<ResponseJson<CascadeOutcome>, ApiError> {
    deletable_target(&pool, &claims, &id).await?;

    let hierarchy_service = HierarchyService::new(&pool);
    let outcome = match params.strategy.as_deref() {
        None => hierarchy_service.delete_cascade(&id).await?,
        Some("self") => hierarchy_service.delete_self_only(&id).await?,
        Some(other) => {
            return Err(ApiError::invalid_operation(format!(
                "Unknown delete strategy '{}', expected 'self'",
                other
            )));
        }
    };

    Ok(ResponseJson(outcome))
}

/// Cascade-deletes a tutor together with every owned student.
#[axum::debug_handler]
pub async fn delete_tutor_cascade(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<TutorCascadeResponse>, ApiError> {
    let (_, role) = deletable_target(&pool, &claims, &id).await?;
    if role.name != RoleName::Tutor {
        return Err(ApiError::invalid_operation(format!(
            "User '{}' is not a tutor",
            id
        )));
    }

    let hierarchy_service = HierarchyService::new(&pool);
    let outcome = hierarchy_service.delete_cascade(&id).await?;

    Ok(ResponseJson(TutorCascadeResponse {
        tutor_deleted: outcome.deleted_self,
        students_deleted: outcome.deleted_students.unwrap_or(0),
    }))
}

/// Cascade-deletes an admin, every tutor it owns and every student those
/// tutors own.
#[axum::debug_handler]
pub async fn delete_admin_cascade(
    Extension(claims): Extension<TokenClaims>,
    Extension(pool): Extension<SqlitePool>,
    Path(id): Path<String>,
) -> Result<ResponseJson<AdminCascadeResponse>, ApiError> {
    let (_, role) = deletable_target(&pool, &claims, &id).await?;
    if !matches!(role.name, RoleName::Admin | RoleName::Superadmin) {
        return Err(ApiError::invalid_operation(format!(
            "User '{}' is not an admin",
            id
        )));
    }

    let hierarchy_service = HierarchyService::new(&pool);
    let outcome = hierarchy_service.delete_cascade(&id).await?;

    Ok(ResponseJson(AdminCascadeResponse {
        admin_deleted: outcome.deleted_self,
        tutors_deleted: outcome.deleted_tutors.unwrap_or(0),
        students_deleted: outcome.deleted_students.unwrap_or(0),
    }))
}

/// Shared deletion preconditions, checked before any row is touched:
/// no self-delete, the target must exist, and it must be inactive.
async fn deletable_target(
    pool: &SqlitePool,
    claims: &TokenClaims,
    id: &str,
) -> Result<(User, Role), ApiError> {
    if claims.sub == id {
        return Err(ApiError::invalid_operation("Cannot delete your own account"));
    }

    let user_service = UserService::new(pool);
    let user = user_service.get_user_required(id).await?;
    let role = user_service.role_for_user(&user).await?;

    if user.is_active {
        return Err(ApiError::invalid_operation(
            "Active accounts cannot be deleted, deactivate the account first",
        ));
    }

    Ok((user, role))
}

fn summaries(users: &[User], role: RoleName) -> Vec<UserSummary> {
    users
        .iter()
        .map(|user| UserSummary::from_user(user, role))
        .collect()
}
