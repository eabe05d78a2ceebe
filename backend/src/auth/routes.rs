//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle signup, login, token refreshing and logout. They are
//! designed to be integrated into the main Axum router.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
}
