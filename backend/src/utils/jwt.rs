//! JWT token utilities for authentication and authorization.
//!
//! Provides signing and verification of the access/refresh token pair. The
//! two token kinds are signed with distinct secrets so a leaked access-token
//! key cannot mint long-lived refresh tokens (and vice versa); short access
//! lifetimes bound the damage window of a stolen token without a server-side
//! revocation list.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::{RoleName, User};
use crate::errors::{ServiceError, ServiceResult};

/// Claims embedded in both access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Principal ID
    pub sub: String,
    /// Principal email
    pub email: String,
    /// Role ID
    pub role_id: String,
    /// Role name
    pub role: RoleName,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl TokenClaims {
    pub fn principal_id(&self) -> &str {
        &self.sub
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}

/// An access/refresh token pair as handed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Stateless codec for the token pair, built once at startup.
#[derive(Clone)]
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_seconds: u64,
    refresh_ttl_days: u64,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl_seconds: u64,
        refresh_ttl_days: u64,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        TokenCodec {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl_seconds,
            refresh_ttl_days,
            validation,
        }
    }

    /// Builds the codec from resolved configuration. Secret presence has
    /// already been enforced by [`Config::from_env`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.access_token_secret,
            &config.refresh_token_secret,
            config.access_token_ttl_seconds,
            config.refresh_token_ttl_days,
        )
    }

    /// Signs a fresh access/refresh pair for the given principal.
    pub fn issue_pair(&self, user: &User, role: RoleName) -> ServiceResult<TokenPair> {
        let now = Utc::now();

        let access_claims = TokenClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role_id: user.role_id.clone(),
            role,
            exp: (now + Duration::seconds(self.access_ttl_seconds as i64)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let refresh_claims = TokenClaims {
            exp: (now + Duration::days(self.refresh_ttl_days as i64)).timestamp() as usize,
            ..access_claims.clone()
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verifies signature and expiry against the access secret. Returns
    /// `None` on any failure, it never panics or errors.
    pub fn verify_access(&self, token: &str) -> Option<TokenClaims> {
        decode::<TokenClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }

    /// Verifies signature and expiry against the refresh secret.
    pub fn verify_refresh(&self, token: &str) -> Option<TokenClaims> {
        decode::<TokenClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }

    /// Decodes claims without checking signature or expiry. Diagnostics
    /// only, never an authorization decision.
    pub fn decode_unsafe(token: &str) -> Option<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .ok()
    }
}
