//! Konfiguration
//!
//! Umgebungsvariablen und Datenbank-Pool.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::{AdminSeed, EnvironmentConfig, StorageBackend};
