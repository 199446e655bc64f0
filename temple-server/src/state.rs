//! Shared application state

use std::sync::Arc;

use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{JwtConfig, JwtService, hash_password};
use crate::config::Config;
use crate::db;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// State handed to every handler (cheap to clone)
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Token issue and validation
    pub jwt: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the database, apply migrations and seed the first super admin
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url, config.database_max_connections).await?;
        seed_super_admin(&pool, config).await?;

        Ok(Self {
            pool,
            jwt: Arc::new(JwtService::with_config(JwtConfig::from_config(config))),
            config: Arc::new(config.clone()),
        })
    }
}

/// Create the configured super admin when no user exists yet
async fn seed_super_admin(pool: &SqlitePool, config: &Config) -> Result<(), BoxError> {
    if db::users::count(pool).await? > 0 {
        return Ok(());
    }

    let password_hash =
        hash_password(&config.admin_password).map_err(|e| format!("hash admin password: {e}"))?;
    let id = db::users::create(
        pool,
        db::users::UserRow {
            name: &config.admin_name,
            email: &config.admin_email,
            password_hash: &password_hash,
            role: Role::SuperAdmin,
            is_active: true,
        },
    )
    .await?;

    tracing::info!(user_id = id, email = %config.admin_email, "Seeded super admin");
    Ok(())
}
