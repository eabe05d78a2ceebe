//! Data structures for the user-management API endpoints.

use serde::{Deserialize, Serialize};

/// Payload for activating or deactivating a principal.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Query parameters for the generic delete endpoint. `strategy=self` opts
/// into a single-row delete that leaves subordinates orphaned; the default
/// is the role-dependent cascade.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub strategy: Option<String>,
}

/// Deletion counts for the tutor-scoped cascade endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorCascadeResponse {
    pub tutor_deleted: u64,
    pub students_deleted: u64,
}

/// Deletion counts for the admin-scoped cascade endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCascadeResponse {
    pub admin_deleted: u64,
    pub tutors_deleted: u64,
    pub students_deleted: u64,
}
