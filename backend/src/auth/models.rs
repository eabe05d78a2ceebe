//! Data structures for authentication-related entities.
//!
//! This module defines request/response models for login, signup and token
//! refresh, used for data transfer within the authentication flow.

use crate::database::models::{RoleName, User};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Principal summary returned by auth and user endpoints. Never carries the
/// password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: RoleName,
    pub role_id: String,
    pub status: String,
    pub created_by: Option<String>,
}

impl UserSummary {
    pub fn from_user(user: &User, role: RoleName) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role,
            role_id: user.role_id.clone(),
            status: if user.is_active {
                "active".to_string()
            } else {
                "inactive".to_string()
            },
            created_by: user.created_by.clone(),
        }
    }
}

/// Login/signup response containing the token pair and user info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserSummary,
    pub access_token: String,
    pub refresh_token: String,
}

/// Token refresh request. The field defaults to empty so an absent token
/// surfaces as a 400 validation error instead of a body rejection.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token refresh response carrying the rotated pair
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}
