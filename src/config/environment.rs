//! Umgebungsvariablen
//!
//! Liest die Konfiguration beim Start einmalig aus der Umgebung (und `.env`).

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use super::database::DatabaseConfig;

/// Speicher-Backend für Fahrten, Fahrer und Termine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("STORAGE must be 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

/// Zugangsdaten für den initialen Admin
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Leer bedeutet: jede Herkunft erlaubt
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub storage: StorageBackend,
    pub database: Option<DatabaseConfig>,
    pub admin_seed: Option<AdminSeed>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_origins: Vec::new(),
            log_level: "info".to_string(),
            storage: StorageBackend::Memory,
            database: None,
            admin_seed: None,
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let port = var_or("PORT", "4000")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let storage: StorageBackend = var_or("STORAGE", "postgres").parse()?;

        let database = match storage {
            StorageBackend::Postgres => {
                let url = optional_var("DATABASE_URL")
                    .ok_or_else(|| anyhow!("DATABASE_URL must be set when STORAGE=postgres"))?;
                Some(DatabaseConfig::new(url))
            }
            StorageBackend::Memory => None,
        };

        let admin_seed = match (optional_var("ADMIN_EMAIL"), optional_var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: var_or("ADMIN_NAME", "Administrator"),
                email,
                password,
            }),
            (None, None) => None,
            _ => return Err(anyhow!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")),
        };

        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            host: var_or("HOST", "0.0.0.0"),
            port,
            cors_origins: optional_var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            log_level: var_or("LOG_LEVEL", "info"),
            storage,
            database,
            admin_seed,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
