//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server port, and the token signing secrets. Secret
//! resolution happens once here so a misconfigured process dies at startup
//! instead of failing requests later.

use anyhow::{Context, Result, bail};
use std::env;

/// Deployment environment, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_days: u64,
    pub environment: Environment,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let environment = match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        };

        let access_token_secret =
            env::var("ACCESS_TOKEN_SECRET").context("ACCESS_TOKEN_SECRET not set")?;

        // The refresh secret must be distinct in production; outside of it a
        // missing value falls back to the access secret so local setups keep
        // working with a single variable.
        let refresh_token_secret = match env::var("REFRESH_TOKEN_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                if environment == Environment::Production {
                    bail!("REFRESH_TOKEN_SECRET not set (required in production)");
                }
                tracing::warn!(
                    "REFRESH_TOKEN_SECRET not set, falling back to ACCESS_TOKEN_SECRET"
                );
                access_token_secret.clone()
            }
        };

        let access_token_ttl_seconds = env::var("ACCESS_TOKEN_TTL_SECONDS")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<u64>()
            .context("ACCESS_TOKEN_TTL_SECONDS must be a valid number")?;

        let refresh_token_ttl_days = env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse::<u64>()
            .context("REFRESH_TOKEN_TTL_DAYS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            access_token_secret,
            refresh_token_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_days,
            environment,
            server_port,
        })
    }
}
