//! Defines the HTTP routes for user profile and hierarchy management.
//!
//! Routes are grouped by the gate they sit behind: identity-only endpoints
//! layer `jwt_auth` alone, role-gated endpoints stack the role check on top.

use super::handlers::{
    create_student, create_tutor, delete_admin_cascade, delete_tutor_cascade, delete_user,
    get_profile, list_owned_students, list_owned_tutors, set_user_status,
};
use crate::auth::middleware::{jwt_auth, require_admin, require_tutor};
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

/// Creates the user router with all profile and hierarchy routes.
pub fn user_router() -> Router {
    let identity_routes = Router::new()
        .route("/profile", get(get_profile))
        .layer(middleware::from_fn(jwt_auth));

    let admin_routes = Router::new()
        .route("/hierarchy", post(create_tutor).get(list_owned_tutors))
        .route("/{id}/status", patch(set_user_status))
        .route("/{id}", delete(delete_user))
        .route("/tutor/{id}/cascade", delete(delete_tutor_cascade))
        .route("/admin/{id}/cascade", delete(delete_admin_cascade))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn(jwt_auth));

    let tutor_routes = Router::new()
        .route(
            "/tutor-student",
            post(create_student).get(list_owned_students),
        )
        .layer(middleware::from_fn(require_tutor))
        .layer(middleware::from_fn(jwt_auth));

    Router::new()
        .merge(identity_routes)
        .merge(admin_routes)
        .merge(tutor_routes)
}
