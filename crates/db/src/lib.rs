//! Postgres persistence for workspaces, channels, people and the dispatch
//! and onboarding logs.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Database settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size (default: `25`).
    pub max_connections: u32,
    /// Apply pending migrations at startup (default: `true`).
    pub migrations_auto_apply: bool,
}

impl DatabaseConfig {
    /// Load from environment variables.
    ///
    /// | Env Var                 | Default  |
    /// |-------------------------|----------|
    /// | `DATABASE_URL`          | required |
    /// | `DB_MAX_CONNECTIONS`    | `25`     |
    /// | `MIGRATIONS_AUTO_APPLY` | `true`   |
    ///
    /// Returns `None` when `DATABASE_URL` is missing or blank.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())?;

        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(25);

        let migrations_auto_apply = std::env::var("MIGRATIONS_AUTO_APPLY")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(true);

        Some(Self {
            url,
            max_connections,
            migrations_auto_apply,
        })
    }
}

/// Create a connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

/// Round-trip a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
