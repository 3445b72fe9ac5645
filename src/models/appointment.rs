//! Modell Termin
//!
//! Ein Termin ist eine vom Admin zugewiesene, geplante Fahrt. Der Fahrer
//! nimmt ihn an oder lehnt ihn ab; beides ist endgültig. Angenommene
//! Termine dienen als Vorlage für neue Fahrten.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Declined,
}

impl AppointmentStatus {
    /// Angenommen und abgelehnt sind Endzustände
    pub fn is_terminal(self) -> bool {
        !matches!(self, AppointmentStatus::Pending)
    }
}

/// Termin - Tabelle `appointments`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub driver_id: Uuid,
    /// Name zum Zeitpunkt der Zuweisung
    pub driver_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub start_location: String,
    pub stations: Vec<String>,
    pub end_location: String,
    pub purpose: String,
    pub status: AppointmentStatus,
    pub assigned_by: Option<String>,
    pub assigned_at: DateTime<Utc>,
}
