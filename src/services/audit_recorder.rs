//! Änderungsprotokoll für Fahrten
//!
//! Baut die Protokolleinträge, die zusammen mit jeder Änderung einer Fahrt
//! gespeichert werden. Für `update` und `delete` muss der Zustand VOR der
//! Änderung übergeben werden, für `create` der gerade angelegte Zustand.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{ChangeType, Trip, TripLog};

#[derive(Debug, Default, Clone, Copy)]
pub struct AuditRecorder;

impl AuditRecorder {
    /// Feldgenaue Kopie der Fahrt; ohne expliziten Akteur zählt der Fahrer
    pub fn record(&self, trip: &Trip, change_type: ChangeType, changed_by: Option<&str>) -> TripLog {
        self.record_at(trip, change_type, changed_by, Utc::now())
    }

    pub fn record_at(
        &self,
        trip: &Trip,
        change_type: ChangeType,
        changed_by: Option<&str>,
        at: DateTime<Utc>,
    ) -> TripLog {
        let changed_by = changed_by
            .map(str::trim)
            .filter(|actor| !actor.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| trip.details.driver_id.to_string());

        TripLog {
            id: Uuid::new_v4(),
            trip_id: trip.id,
            snapshot: trip.details.clone(),
            trip_created_at: trip.created_at,
            change_type,
            changed_by,
            created_at: at,
        }
    }
}

/// Protokoll einer Fahrt als eine Zeile: `update (fahrer @ zeitpunkt); ...`
pub fn format_trail(logs: &[&TripLog]) -> String {
    logs.iter()
        .map(|log| {
            format!(
                "{} ({} @ {})",
                log.change_type,
                log.changed_by,
                log.created_at.to_rfc3339()
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
