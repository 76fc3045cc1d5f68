//! Authentication core for a multi-tenant device-management platform.
//!
//! Authenticates devices and operators, derives stable device identities,
//! issues tenant-scoped RS256 tokens and signs device challenges.

pub mod config;
pub mod dtos;
pub mod models;
pub mod services;
pub mod utils;

use service_core::error::AppError;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::{AuthService, MongoDb, SigningKeys};
use crate::utils::SystemClock;

/// Wire the production auth service: signing keys, a reachable MongoDB
/// store and the system clock. Any failure here is fatal to startup.
pub async fn bootstrap(config: &AuthConfig) -> Result<AuthService, AppError> {
    let keys = SigningKeys::load(&config.keys).map_err(AppError::ConfigError)?;
    tracing::info!("Signing keys initialized");

    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    db.health_check().await?;
    db.initialize_indexes().await?;
    tracing::info!("Database initialized successfully");

    Ok(AuthService::new(
        Arc::new(db),
        Arc::new(keys),
        Arc::new(SystemClock),
    ))
}
