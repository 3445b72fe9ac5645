//! Lebenszyklus einer Fahrt
//!
//! Einzige Stelle, an der Fahrten angelegt, geändert und gelöscht werden.
//! Jede Änderung wird zusammen mit ihrem Protokolleintrag gespeichert.
//!
//! Regeln:
//! - Pflichtfelder: Fahrer, Datum, Start, Ziel, Zweck, Geschäftspartner
//! - Umweg nur mit nicht-leerer Begründung
//! - Ende-km größer als Start-km, Distanz = Ende-km - Start-km
//! - Abgeschlossene Fahrten sind nur bis 7 ganze Tage nach Fahrtende änderbar;
//!   aktive Fahrten bleiben ohne Frist änderbar

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::trip_dto::{CreateTripRequest, UpdateTripRequest};
use crate::models::{
    AppointmentStatus, ChangeType, Trip, TripDetails, TripFilter, TripLog, TripStatus,
    EDIT_WINDOW_DAYS,
};
use crate::repositories::{AppointmentRepository, DriverRepository, TripRepository};
use crate::services::audit_recorder::AuditRecorder;
use crate::services::clock::Clock;
use crate::utils::errors::{forbidden_error, not_found_error, validation_error, AppResult};
use crate::utils::validation::{clean_stations, parse_date, parse_km, parse_optional_time};

pub struct TripLifecycle {
    trips: Arc<dyn TripRepository>,
    drivers: Arc<dyn DriverRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    clock: Arc<dyn Clock>,
    recorder: AuditRecorder,
}

impl TripLifecycle {
    pub fn new(
        trips: Arc<dyn TripRepository>,
        drivers: Arc<dyn DriverRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            trips,
            drivers,
            appointments,
            clock,
            recorder: AuditRecorder,
        }
    }

    pub async fn create(&self, mut request: CreateTripRequest) -> AppResult<Trip> {
        request.normalize();
        // Leere Begründung bleibt gesetzt und scheitert an validate()
        request.validate()?;

        if request.detour && request.detour_reason.is_none() {
            return Err(validation_error(
                "detour_reason",
                "Für einen Umweg ist eine Begründung erforderlich",
            ));
        }

        // Pflichtfelder sind durch validate() gesetzt
        let driver_id = request.driver_id.unwrap_or_default();
        if self.drivers.find_by_id(driver_id).await?.is_none() {
            return Err(validation_error(
                "driver_id",
                "Der angegebene Fahrer existiert nicht",
            ));
        }
        let date = parse_date("date", request.date.as_deref().unwrap_or_default())?;

        let start_km = parse_km("start_km", request.start_km.as_ref())?;
        let end_km = parse_km("end_km", request.end_km.as_ref())?;
        let total = parse_km("total_distance", request.total_distance.as_ref())?;

        if let Some(appointment_id) = request.appointment_id {
            self.ensure_appointment_usable(appointment_id, driver_id).await?;
        }

        let details = TripDetails {
            driver_id,
            driver_name: request.driver_name.unwrap_or_default(),
            date,
            time: parse_optional_time("time", request.time.as_deref())?,
            start_location: request.start_location.unwrap_or_default(),
            stations: clean_stations(request.stations),
            end_location: request.end_location.unwrap_or_default(),
            purpose: request.purpose.unwrap_or_default(),
            business_partner: request.business_partner.unwrap_or_default(),
            detour_reason: request.detour_reason,
            status: request.status.unwrap_or(TripStatus::Active),
            start_km,
            end_km,
            total_distance: distance(start_km, end_km, total)?,
            start_time: parse_optional_time("start_time", request.start_time.as_deref())?,
            end_time: parse_optional_time("end_time", request.end_time.as_deref())?,
            appointment_id: request.appointment_id,
        };

        let trip = Trip {
            id: Uuid::new_v4(),
            details,
            created_at: Utc::now(),
        };

        let log = self
            .recorder
            .record(&trip, ChangeType::Create, request.changed_by.as_deref());
        self.trips.insert_with_log(&trip, &log).await?;

        tracing::info!(
            trip_id = %trip.id,
            driver_id = %trip.details.driver_id,
            changed_by = %log.changed_by,
            "trip created"
        );

        Ok(trip)
    }

    pub async fn update(&self, id: Uuid, mut patch: UpdateTripRequest) -> AppResult<Trip> {
        let current = self.get(id).await?;
        self.ensure_mutable(&current)?;

        patch.normalize();
        patch.validate()?;

        let details = apply_patch(&current.details, &patch)?;
        let updated = Trip {
            details,
            ..current.clone()
        };

        let log = self
            .recorder
            .record(&current, ChangeType::Update, patch.changed_by.as_deref());
        self.trips.update_with_log(&updated, &log).await?;

        tracing::info!(trip_id = %id, changed_by = %log.changed_by, "trip updated");

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, changed_by: Option<&str>) -> AppResult<()> {
        let current = self.get(id).await?;
        self.ensure_mutable(&current)?;

        let log = self.recorder.record(&current, ChangeType::Delete, changed_by);
        self.trips.delete_with_log(id, &log).await?;

        tracing::info!(trip_id = %id, changed_by = %log.changed_by, "trip deleted");

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Trip> {
        self.trips
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fahrt", id))
    }

    pub async fn list(&self, filter: &TripFilter) -> AppResult<Vec<Trip>> {
        self.trips.list(filter).await
    }

    /// Protokoll einer Fahrt, auch wenn die Fahrt bereits gelöscht ist
    pub async fn logs(&self, id: Uuid) -> AppResult<Vec<TripLog>> {
        let logs = self.trips.logs_for_trips(&[id]).await?;
        if logs.is_empty() && self.trips.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Fahrt", id));
        }
        Ok(logs)
    }

    fn ensure_mutable(&self, trip: &Trip) -> AppResult<()> {
        let now = self.clock.now();
        if trip.details.is_locked(now) {
            tracing::warn!(
                trip_id = %trip.id,
                days_since_end = trip.details.days_since_end(now),
                "edit window expired"
            );
            return Err(forbidden_error(format!(
                "Die Fahrt ist abgeschlossen und das Bearbeitungsfenster von {} Tagen ist abgelaufen",
                EDIT_WINDOW_DAYS
            )));
        }
        Ok(())
    }

    async fn ensure_appointment_usable(&self, appointment_id: Uuid, driver_id: Uuid) -> AppResult<()> {
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| validation_error("appointment_id", "Der angegebene Termin existiert nicht"))?;

        if appointment.driver_id != driver_id {
            return Err(validation_error(
                "appointment_id",
                "Der Termin ist einem anderen Fahrer zugewiesen",
            ));
        }
        if appointment.status != AppointmentStatus::Accepted {
            return Err(validation_error(
                "appointment_id",
                "Nur angenommene Termine können als Fahrt erfasst werden",
            ));
        }
        Ok(())
    }
}

/// Distanz aus den Kilometerständen; ohne beide Stände gilt die übergebene Distanz
fn distance(start_km: Option<i32>, end_km: Option<i32>, total: Option<i32>) -> AppResult<Option<i32>> {
    match (start_km, end_km) {
        (Some(start), Some(end)) if end <= start => Err(validation_error(
            "end_km",
            "End-Kilometerstand muss höher als Start-Kilometerstand sein",
        )),
        (Some(start), Some(end)) => Ok(Some(end - start)),
        _ => Ok(total),
    }
}

fn apply_patch(current: &TripDetails, patch: &UpdateTripRequest) -> AppResult<TripDetails> {
    let mut next = current.clone();

    if let Some(date) = &patch.date {
        next.date = parse_date("date", date)?;
    }
    if patch.time.is_some() {
        next.time = parse_optional_time("time", patch.time.as_deref())?;
    }
    if let Some(start) = &patch.start_location {
        next.start_location = start.clone();
    }
    if let Some(stations) = &patch.stations {
        next.stations = clean_stations(stations.clone());
    }
    if let Some(end) = &patch.end_location {
        next.end_location = end.clone();
    }
    if let Some(purpose) = &patch.purpose {
        next.purpose = purpose.clone();
    }
    if let Some(partner) = &patch.business_partner {
        next.business_partner = partner.clone();
    }

    match (patch.detour, &patch.detour_reason) {
        (Some(false), Some(_)) => {
            return Err(validation_error(
                "detour_reason",
                "Eine Umweg-Begründung ist nur mit Umweg zulässig",
            ));
        }
        (Some(false), None) => next.detour_reason = None,
        (_, Some(reason)) => next.detour_reason = Some(reason.clone()),
        (Some(true), None) if next.detour_reason.is_none() => {
            return Err(validation_error(
                "detour_reason",
                "Für einen Umweg ist eine Begründung erforderlich",
            ));
        }
        _ => {}
    }

    if let Some(status) = patch.status {
        if current.status == TripStatus::Completed && status == TripStatus::Active {
            return Err(validation_error(
                "status",
                "Eine abgeschlossene Fahrt kann nicht wieder geöffnet werden",
            ));
        }
        next.status = status;
    }

    if patch.start_time.is_some() {
        next.start_time = parse_optional_time("start_time", patch.start_time.as_deref())?;
    }
    if patch.end_time.is_some() {
        next.end_time = parse_optional_time("end_time", patch.end_time.as_deref())?;
    }

    if let Some(value) = &patch.start_km {
        next.start_km = parse_km("start_km", Some(value))?;
    }
    if let Some(value) = &patch.end_km {
        next.end_km = parse_km("end_km", Some(value))?;
    }
    let total = match &patch.total_distance {
        Some(value) => parse_km("total_distance", Some(value))?,
        None => next.total_distance,
    };
    next.total_distance = distance(next.start_km, next.end_km, total)?;

    // Sonst ließe sich das Bearbeitungsfenster beliebig verlängern
    if current.status == TripStatus::Completed && next.effective_end() > current.effective_end() {
        return Err(validation_error(
            "end_time",
            "Das Fahrtende einer abgeschlossenen Fahrt kann nicht nach hinten verschoben werden",
        ));
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn details() -> TripDetails {
        TripDetails {
            driver_id: Uuid::new_v4(),
            driver_name: "Max Mustermann".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            time: None,
            start_location: "München".to_string(),
            stations: vec![],
            end_location: "Augsburg".to_string(),
            purpose: "Kundentermin".to_string(),
            business_partner: "Acme".to_string(),
            detour_reason: None,
            status: TripStatus::Active,
            start_km: Some(100),
            end_km: Some(180),
            total_distance: Some(80),
            start_time: None,
            end_time: None,
            appointment_id: None,
        }
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Some(10), Some(25), None).unwrap(), Some(15));
        assert_eq!(distance(None, None, Some(42)).unwrap(), Some(42));
        assert!(distance(Some(25), Some(25), None).is_err());
        assert!(distance(Some(30), Some(25), None).is_err());
    }

    #[test]
    fn test_patch_recomputes_distance() {
        let patch = UpdateTripRequest {
            end_km: Some(json!("200")),
            ..Default::default()
        };
        let next = apply_patch(&details(), &patch).unwrap();
        assert_eq!(next.end_km, Some(200));
        assert_eq!(next.total_distance, Some(100));
    }

    #[test]
    fn test_patch_detour_rules() {
        let with_reason = UpdateTripRequest {
            detour: Some(true),
            detour_reason: Some("Umleitung".to_string()),
            ..Default::default()
        };
        let next = apply_patch(&details(), &with_reason).unwrap();
        assert_eq!(next.detour_reason.as_deref(), Some("Umleitung"));

        let cleared = UpdateTripRequest {
            detour: Some(false),
            ..Default::default()
        };
        assert_eq!(apply_patch(&next, &cleared).unwrap().detour_reason, None);

        let missing = UpdateTripRequest {
            detour: Some(true),
            ..Default::default()
        };
        assert!(apply_patch(&details(), &missing).is_err());
    }

    #[test]
    fn test_patch_rejects_reason_with_detour_off() {
        let patch = UpdateTripRequest {
            detour: Some(false),
            detour_reason: Some("Stau".to_string()),
            ..Default::default()
        };
        assert!(apply_patch(&details(), &patch).is_err());
    }

    #[test]
    fn test_patch_cannot_postpone_end_of_completed_trip() {
        let completed = TripDetails {
            status: TripStatus::Completed,
            end_time: Some(chrono::NaiveTime::from_hms_opt(17, 0, 0).unwrap()),
            ..details()
        };
        let later_day = UpdateTripRequest {
            date: Some("2024-05-11".to_string()),
            ..Default::default()
        };
        assert!(apply_patch(&completed, &later_day).is_err());

        let later_time = UpdateTripRequest {
            end_time: Some("18:30".to_string()),
            ..Default::default()
        };
        assert!(apply_patch(&completed, &later_time).is_err());

        let earlier = UpdateTripRequest {
            end_time: Some("16:15".to_string()),
            ..Default::default()
        };
        assert!(apply_patch(&completed, &earlier).is_ok());

        // aktive Fahrten dürfen beim Abschließen ein späteres Ende bekommen
        let finish = UpdateTripRequest {
            status: Some(TripStatus::Completed),
            date: Some("2024-05-12".to_string()),
            end_time: Some("19:00".to_string()),
            ..Default::default()
        };
        assert!(apply_patch(&details(), &finish).is_ok());
    }

    #[test]
    fn test_patch_cannot_reopen_completed_trip() {
        let completed = TripDetails {
            status: TripStatus::Completed,
            ..details()
        };
        let reopen = UpdateTripRequest {
            status: Some(TripStatus::Active),
            ..Default::default()
        };
        assert!(apply_patch(&completed, &reopen).is_err());

        let complete = UpdateTripRequest {
            status: Some(TripStatus::Completed),
            ..Default::default()
        };
        assert_eq!(
            apply_patch(&details(), &complete).unwrap().status,
            TripStatus::Completed
        );
    }
}
