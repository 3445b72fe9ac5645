use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn, Level};

use fahrtenbuch::config::{EnvironmentConfig, StorageBackend};
use fahrtenbuch::database::DatabaseConnection;
use fahrtenbuch::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    let level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!(environment = %config.environment, storage = ?config.storage, "starting fahrtenbuch");

    let state = match (config.storage, config.database.clone()) {
        (StorageBackend::Postgres, Some(database)) => {
            let connection = DatabaseConnection::connect(&database).await?;
            connection.run_migrations().await?;
            AppState::with_postgres(connection.pool().clone(), config.clone())
        }
        (StorageBackend::Postgres, None) => {
            anyhow::bail!("postgres storage selected without database configuration")
        }
        (StorageBackend::Memory, _) => {
            warn!("using in-memory storage, data is lost on shutdown");
            AppState::in_memory(config.clone())
        }
    };

    if let Some(seed) = &config.admin_seed {
        state
            .auth_service()
            .seed_admin(&seed.name, &seed.email, &seed.password)
            .await
            .context("admin seeding failed")?;
    }

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;

    info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "server error");
            e
        })?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
