//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::errors::{ServiceError, ServiceResult};
use crate::services::user_service::{SignupRequest, UserService};
use crate::utils::jwt::TokenCodec;
use sqlx::SqlitePool;
use validator::Validate;

/// Authentication service for signup, login and token refresh.
pub struct AuthService<'a> {
    codec: &'a TokenCodec,
    user_service: UserService<'a>,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, codec: &'a TokenCodec) -> Self {
        AuthService {
            codec,
            user_service: UserService::new(pool),
        }
    }

    /// Self-registration. The new principal gets the default `student` role
    /// and an immediate token pair, so the client is logged in right away.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        let (user, role) = self.user_service.signup(request).await?;

        let pair = self.codec.issue_pair(&user, role.name)?;

        Ok(AuthResponse {
            user: UserSummary::from_user(&user, role.name),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Authenticate a credential pair and mint a token pair.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::from_validation(validation_errors));
        }

        let user = self
            .user_service
            .authenticate_user(&request.email, &request.password)
            .await?;
        let role = self.user_service.role_for_user(&user).await?;

        let pair = self.codec.issue_pair(&user, role.name)?;

        Ok(AuthResponse {
            user: UserSummary::from_user(&user, role.name),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    /// Rotate the token pair from a refresh token.
    ///
    /// The refresh token must verify against the refresh secret (an access
    /// token never does), and the principal must still exist and be active.
    /// All of those failures surface as 401, never as 404.
    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::from_validation(validation_errors));
        }

        let claims = self
            .codec
            .verify_refresh(&request.refresh_token)
            .ok_or_else(|| ServiceError::unauthorized("Invalid or expired refresh token"))?;

        let user = match self.user_service.get_user_required(&claims.sub).await {
            Ok(user) => user,
            Err(ServiceError::NotFound { .. }) => {
                return Err(ServiceError::unauthorized("Unknown principal"));
            }
            Err(other) => return Err(other),
        };

        if !user.is_active {
            return Err(ServiceError::unauthorized("Account is inactive"));
        }

        // Role may have changed since the refresh token was minted; re-read
        // it so the new pair carries current claims.
        let role = self.user_service.role_for_user(&user).await?;
        let pair = self.codec.issue_pair(&user, role.name)?;

        Ok(RefreshTokenResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }
}
