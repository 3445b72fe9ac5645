//! Modell Fahrer
//!
//! Fahrer werden vom Admin angelegt und nie gelöscht, nur deaktiviert,
//! damit ältere Fahrten weiterhin auf sie verweisen können.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Status des Fahrers - Enum `driver_status` in PostgreSQL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "driver_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Active,
    Inactive,
}

/// Fahrer - Tabelle `drivers`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    /// Personalnummer, eindeutig und unveränderlich
    pub employee_number: String,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    pub fn new(name: String, employee_number: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            employee_number,
            status: DriverStatus::Active,
            created_at: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == DriverStatus::Active
    }
}
