/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including dependency connection, migrations and route configuration.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL and run migrations
 * 2. Connect to Redis and check it with `PING`
 * 3. Build the SMTP transport
 * 4. Assemble `AppState` and the router
 *
 * Any failure here aborts start-up. A server that cannot reach its
 * database or cache would only answer 500s.
 */

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::backend::auth::users::PgUserRepo;
use crate::backend::codes::{CacheError, RedisCodeStore};
use crate::backend::email::{MailError, SmtpMailer};
use crate::backend::follows::db::PgFollowRepo;
use crate::backend::posts::db::PgPostRepo;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{Config, ConfigError};
use crate::backend::server::state::AppState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Cache connection failed: {0}")]
    Cache(#[from] CacheError),

    #[error("Mail transport setup failed: {0}")]
    Mail(#[from] MailError),
}

/// Connect to PostgreSQL and bring the schema up to date
pub async fn load_database(database_url: &str) -> Result<PgPool, StartupError> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            e
        })?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Returns `StartupError` if any collaborator cannot be reached or built.
pub async fn create_app(config: Config) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing SNS backend server");

    let pool = load_database(&config.database_url).await?;

    let codes = RedisCodeStore::connect(&config.redis_url).await.map_err(|e| {
        tracing::error!("Failed to connect to Redis: {}", e);
        e
    })?;

    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        &config.email_address,
        &config.email_password,
    )?;

    let app_state = AppState::new(
        config,
        Arc::new(PgUserRepo::new(pool.clone())),
        Arc::new(PgPostRepo::new(pool.clone())),
        Arc::new(PgFollowRepo::new(pool)),
        Arc::new(codes),
        Arc::new(mailer),
    );

    let app = create_router(app_state);
    tracing::info!("Router configured");

    Ok(app)
}
