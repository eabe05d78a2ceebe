//! Main entry point for the ClassNest backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection and the token codec, and registers all API routes and
//! middleware. It orchestrates the application's startup and defines its
//! overall structure.

use classnest_backend::config::Config;
use classnest_backend::database::Database;
use classnest_backend::utils::jwt::TokenCodec;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let codec = TokenCodec::from_config(&config);
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    let app = classnest_backend::app(pool, codec);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting ClassNest server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}
