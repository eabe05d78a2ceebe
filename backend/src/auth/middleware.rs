//! Middleware for protecting authenticated routes and handling authorization.
//!
//! `jwt_auth` authenticates the bearer token and attaches the typed claims
//! to the request; `require_admin`/`require_tutor` gate on the embedded
//! role. The two layers compose: identity-only endpoints use `jwt_auth`
//! alone, role-gated endpoints stack both.

use crate::api::common::ApiError;
use crate::database::models::RoleName;
use crate::utils::jwt::{TokenClaims, TokenCodec};
use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// JWT authentication middleware. Rejects with 401 when the bearer token is
/// absent, malformed, expired or signed with the wrong key; otherwise
/// inserts [`TokenClaims`] into the request extensions.
pub async fn jwt_auth(
    Extension(codec): Extension<TokenCodec>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must be a Bearer token"))?;

    match codec.verify_access(token) {
        Some(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        None => Err(ApiError::unauthorized("Invalid or expired access token")),
    }
}

/// Admin role authorization middleware. Runs after `jwt_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    enforce_role(&request, &[RoleName::Admin])?;
    Ok(next.run(request).await)
}

/// Tutor role authorization middleware. Runs after `jwt_auth`.
pub async fn require_tutor(request: Request, next: Next) -> Result<Response, ApiError> {
    enforce_role(&request, &[RoleName::Tutor])?;
    Ok(next.run(request).await)
}

/// Shared role check. The superadmin bypass is not re-derived here, it lives
/// in [`RoleName::implies_access`].
fn enforce_role(request: &Request, allowed: &[RoleName]) -> Result<(), ApiError> {
    let claims = request
        .extensions()
        .get::<TokenClaims>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !claims.role.implies_access(allowed) {
        return Err(ApiError::forbidden(format!(
            "Role {} is not allowed to access this resource",
            claims.role
        )));
    }

    Ok(())
}
