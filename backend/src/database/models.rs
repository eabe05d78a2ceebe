//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these may differ from API-specific models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use validator::Validate;

/// Closed set of role names known to the system.
///
/// Role checks go through [`RoleName::implies_access`] so the superadmin
/// bypass rule lives in exactly one place instead of being re-derived per
/// handler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Superadmin,
    Admin,
    Tutor,
    Student,
}

impl RoleName {
    /// Whether a principal holding this role may pass a gate that allows
    /// `allowed`. Superadmin passes every gate.
    pub fn implies_access(&self, allowed: &[RoleName]) -> bool {
        matches!(self, RoleName::Superadmin) || allowed.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Superadmin => "superadmin",
            RoleName::Admin => "admin",
            RoleName::Tutor => "tutor",
            RoleName::Student => "student",
        }
    }
}

impl Display for RoleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "superadmin" => Ok(RoleName::Superadmin),
            "admin" => Ok(RoleName::Admin),
            "tutor" => Ok(RoleName::Tutor),
            "student" => Ok(RoleName::Student),
            _ => Err(format!("Invalid role name: {}", input)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: String,
    pub name: RoleName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: String,
    pub is_active: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Directed ownership edge: the admin that provisioned a tutor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminTutor {
    pub admin_id: String,
    pub tutor_id: String,
    pub created_at: DateTime<Utc>,
}

/// Directed ownership edge: the tutor that provisioned a student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TutorStudent {
    pub tutor_id: String,
    pub student_id: String,
    pub created_at: DateTime<Utc>,
}

/// Internal DTO handed to the user repository, password already hashed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "User ID is required"))]
    pub id: String,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password hash is required"))]
    pub password_hash: String,

    #[validate(length(min = 1, message = "Role ID is required"))]
    pub role_id: String,

    pub created_by: Option<String>,
}

/// Request payload for provisioning a subordinate account (admin creates a
/// tutor, tutor creates a student).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubordinate {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1-255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}
