//! Verbindung zu PostgreSQL
//!
//! Baut den Pool auf und spielt die Migrationen aus `migrations/` ein.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        tracing::info!(url = %config.masked_url(), "connecting to database");

        let pool = config
            .create_pool()
            .await
            .context("could not connect to database")?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("database health check failed")?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("database migration failed")?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
