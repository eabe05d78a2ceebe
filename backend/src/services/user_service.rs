//! User business logic service.
//!
//! Handles principal creation, credential checks and status changes.

use crate::database::models::{CreateUser, Role, RoleName, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::UserRepository;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Request payload for self-registration.
#[derive(Debug, Clone, serde::Deserialize, Validate)]
pub struct SignupRequest {
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

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Self-registration: creates a principal with the default `student`
    /// role and no creator.
    ///
    /// # Errors
    /// Returns `ServiceError` for validation failures, duplicate emails and
    /// a missing seeded role.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<(User, Role)> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::from_validation(validation_errors));
        }

        let repo = UserRepository::new(self.pool);
        if repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists("User", &request.email));
        }

        let role_repo = RoleRepository::new(self.pool);
        let role = role_repo
            .get_role_by_name(RoleName::Student)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", RoleName::Student.as_str()))?;

        let password_hash = Self::hash_password(&request.password)?;

        let user = repo
            .create_user(CreateUser {
                id: Uuid::now_v7().to_string(),
                name: request.name,
                email: request.email,
                password_hash,
                role_id: role.id.clone(),
                created_by: None,
            })
            .await?;

        Ok((user, role))
    }

    /// Checks a credential pair against the stored hash.
    ///
    /// The error for an unknown email and for a wrong password is the same
    /// `InvalidCredentials`, so callers cannot probe which emails exist. The
    /// inactive check runs only after the credential has been proven.
    pub async fn authenticate_user(&self, email: &str, password: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_email(email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(ServiceError::InactiveAccount);
        }

        Ok(user)
    }

    /// Retrieves a user by ID with existence verification.
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }

    /// Resolves the role row a user points at.
    pub async fn role_for_user(&self, user: &User) -> ServiceResult<Role> {
        let role_repo = RoleRepository::new(self.pool);
        let role = role_repo
            .get_role_by_id(&user.role_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", &user.role_id))?;
        Ok(role)
    }

    /// Activates or deactivates a principal.
    pub async fn set_status(&self, id: &str, is_active: bool) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .set_active(id, is_active)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(user)
    }

    /// Function to hash a password before storing in database
    pub fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Function to verify a password against the stored hash
    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash).map_err(|e| {
            ServiceError::internal_error(format!("Password verification failed: {}", e))
        })
    }
}
