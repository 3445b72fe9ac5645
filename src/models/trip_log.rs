//! Modell Fahrtenprotokoll
//!
//! Jede Änderung an einer Fahrt erzeugt genau einen Eintrag mit einer
//! vollständigen Kopie der Fahrtdaten. Einträge werden nie geändert oder
//! gelöscht und überleben die Fahrt, auf die sie verweisen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::trip::TripDetails;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "trip_change_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeType::Create => "create",
            ChangeType::Update => "update",
            ChangeType::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protokolleintrag - Tabelle `trip_logs`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripLog {
    pub id: Uuid,
    /// Verweis ohne Fremdschlüssel, die Fahrt kann bereits gelöscht sein
    pub trip_id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub snapshot: TripDetails,
    pub trip_created_at: DateTime<Utc>,
    pub change_type: ChangeType,
    pub changed_by: String,
    pub created_at: DateTime<Utc>,
}
