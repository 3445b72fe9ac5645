//! Hilfsfunktionen für Validierung
//!
//! Parsen und Prüfen von Eingabewerten, die aus JSON-Bodies und
//! Query-Parametern kommen.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::Value;
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppResult};

/// Datum im Format YYYY-MM-DD oder als RFC-3339-Zeitstempel (Datumsanteil zählt)
pub fn parse_date(field: &'static str, value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| validation_error(field, format!("Ungültiges Datum '{}' (erwartet JJJJ-MM-TT)", value)))
}

/// Uhrzeit im Format HH:MM oder HH:MM:SS
pub fn parse_time(field: &'static str, value: &str) -> AppResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| validation_error(field, format!("Ungültige Uhrzeit '{}' (erwartet HH:MM)", value)))
}

pub fn parse_optional_time(field: &'static str, value: Option<&str>) -> AppResult<Option<NaiveTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_time(field, v).map(Some),
    }
}

pub fn parse_uuid(field: &'static str, value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| validation_error(field, format!("Ungültige ID '{}'", value)))
}

/// Kilometerstand aus JSON: Ganzzahl oder numerischer String, `null` bleibt leer.
///
/// Alles andere (Text, Kommazahlen, negative Werte) ist ein Validierungsfehler.
pub fn parse_km(field: &'static str, value: Option<&Value>) -> AppResult<Option<i32>> {
    let invalid = || validation_error(field, format!("{} muss eine nicht-negative ganze Zahl sein", field_label(field)));

    let km = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid)?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    if km < 0 {
        return Err(invalid());
    }
    i32::try_from(km).map(Some).map_err(|_| invalid())
}

/// Leerzeichen am Rand entfernen; nur für bereits vorhandene Werte
pub fn trim_opt(value: &mut Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *v = trimmed.to_string();
        }
    }
}

/// Stationen bereinigen: trimmen, leere Einträge verwerfen, Reihenfolge behalten
pub fn clean_stations(stations: Vec<String>) -> Vec<String> {
    stations
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn field_label(field: &str) -> &str {
    match field {
        "start_km" => "Start-Kilometerstand",
        "end_km" => "End-Kilometerstand",
        "total_distance" => "Gesamtstrecke",
        other => other,
    }
}
