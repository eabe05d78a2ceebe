//! Shared helpers for router-level integration tests.
//!
//! Every test runs against an in-memory SQLite database with the embedded
//! migrations applied and drives the same router the binary serves, via
//! `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use classnest_backend::database::models::{CreateUser, RoleName};
use classnest_backend::repositories::role_repository::RoleRepository;
use classnest_backend::repositories::user_repository::UserRepository;
use classnest_backend::services::user_service::UserService;
use classnest_backend::utils::jwt::TokenCodec;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

pub const ACCESS_SECRET: &str = "integration-access-secret-0123456789";
pub const REFRESH_SECRET: &str = "integration-refresh-secret-0123456789";

pub struct TestApp {
    pub pool: SqlitePool,
    pub codec: TokenCodec,
}

impl TestApp {
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory
        // database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");

        let codec = TokenCodec::new(ACCESS_SECRET, REFRESH_SECRET, 900, 7);

        Self { pool, codec }
    }

    /// Sends one request through a fresh copy of the application router.
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let router = classnest_backend::app(self.pool.clone(), self.codec.clone());
        let response = router.oneshot(request).await.expect("router response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };

        (status, body)
    }

    /// Inserts a principal directly, bypassing the API. Signup only creates
    /// students, so admin/tutor/superadmin fixtures are seeded here.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: RoleName) -> String {
        let role_row = RoleRepository::new(&self.pool)
            .get_role_by_name(role)
            .await
            .expect("role query")
            .expect("seeded role");

        let user = UserRepository::new(&self.pool)
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: UserService::hash_password(password).expect("hash"),
                role_id: role_row.id,
                created_by: None,
            })
            .await
            .expect("seed user");

        user.id
    }

    /// Mints a valid access token for an existing principal.
    pub async fn access_token_for(&self, user_id: &str) -> String {
        let user = UserRepository::new(&self.pool)
            .get_user_by_id(user_id)
            .await
            .expect("user query")
            .expect("user exists");
        let role = RoleRepository::new(&self.pool)
            .get_role_by_id(&user.role_id)
            .await
            .expect("role query")
            .expect("role exists");

        self.codec
            .issue_pair(&user, role.name)
            .expect("token pair")
            .access_token
    }

    pub async fn deactivate(&self, user_id: &str) {
        sqlx::query("UPDATE users SET is_active = FALSE WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .expect("deactivate");
    }

    pub async fn user_exists(&self, user_id: &str) -> bool {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .expect("user count");
        count > 0
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .expect("user count")
    }

    pub async fn edge_counts(&self) -> (i64, i64) {
        let admin_tutors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_tutors")
            .fetch_one(&self.pool)
            .await
            .expect("admin_tutors count");
        let tutor_students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tutor_students")
            .fetch_one(&self.pool)
            .await
            .expect("tutor_students count");

        (admin_tutors, tutor_students)
    }
}

/// Builds a JSON request, optionally with a bearer token.
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    builder.body(body).expect("request")
}
