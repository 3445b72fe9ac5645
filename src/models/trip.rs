//! Modell Fahrt
//!
//! Enthält die Fahrt selbst, die Filter für Listen und Exporte sowie die
//! Berechnung des Bearbeitungsfensters: eine abgeschlossene Fahrt ist nur
//! bis einschließlich 7 ganzen Tagen nach ihrem Ende änderbar.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Ganze Tage nach Fahrtende, in denen eine abgeschlossene Fahrt änderbar bleibt
pub const EDIT_WINDOW_DAYS: i64 = 7;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "trip_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Completed,
}

/// Alle fachlichen Felder einer Fahrt.
///
/// Wird unverändert als Momentaufnahme in `TripLog` kopiert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripDetails {
    pub driver_id: Uuid,
    /// Name zum Zeitpunkt der Erfassung, wird bei Umbenennung nicht nachgezogen
    pub driver_name: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub start_location: String,
    pub stations: Vec<String>,
    pub end_location: String,
    pub purpose: String,
    pub business_partner: String,
    pub detour_reason: Option<String>,
    pub status: TripStatus,
    pub start_km: Option<i32>,
    pub end_km: Option<i32>,
    pub total_distance: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub appointment_id: Option<Uuid>,
}

impl TripDetails {
    /// Zeitpunkt des Fahrtendes: Datum + Endzeit, sonst Datum um Mitternacht
    pub fn effective_end(&self) -> NaiveDateTime {
        let time = self.end_time.unwrap_or(NaiveTime::MIN);
        self.date.and_time(time)
    }

    /// Ganze, abgerundete Tage zwischen Fahrtende und `now`
    pub fn days_since_end(&self, now: NaiveDateTime) -> i64 {
        (now - self.effective_end())
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY)
    }

    /// Abgeschlossen und das Bearbeitungsfenster ist abgelaufen
    pub fn is_locked(&self, now: NaiveDateTime) -> bool {
        self.status == TripStatus::Completed && self.days_since_end(now) > EDIT_WINDOW_DAYS
    }

    pub fn has_detour(&self) -> bool {
        self.detour_reason.is_some()
    }
}

/// Fahrt - Tabelle `trips`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub details: TripDetails,
    pub created_at: DateTime<Utc>,
}

/// Sortierrichtung nach Fahrtdatum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Filter für Fahrtenlisten; Datumsgrenzen sind inklusive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFilter {
    pub driver_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub direction: SortDirection,
}

impl TripFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        let d = &trip.details;
        self.driver_id.map_or(true, |id| d.driver_id == id)
            && self.from.map_or(true, |from| d.date >= from)
            && self.to.map_or(true, |to| d.date <= to)
    }

    /// Sortiert nach Datum, bei Gleichstand nach Erfassungszeitpunkt und ID
    pub fn sort(&self, trips: &mut [Trip]) {
        trips.sort_by(|a, b| {
            let ord = a
                .details
                .date
                .cmp(&b.details.date)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id));
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}
