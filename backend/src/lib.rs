//! ClassNest backend library.
//!
//! Exposes the application modules and the router assembly so the binary and
//! the integration tests build the exact same application.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::utils::jwt::TokenCodec;
use axum::{Extension, Router, response::Json, routing::get};
use sqlx::SqlitePool;

/// Assembles the application router with its shared state layers.
pub fn app(pool: SqlitePool, codec: TokenCodec) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .nest("/api/users", api::user::routes::user_router())
        .layer(Extension(pool))
        .layer(Extension(codec))
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "ClassNest Backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
