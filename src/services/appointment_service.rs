//! Termine
//!
//! Der Admin weist Fahrern Termine zu, der Fahrer nimmt an oder lehnt ab.
//! Angenommene Termine ohne zugehörige Fahrt bilden die Liste der geplanten
//! Fahrten; sie werden nie als eigene Fahrt gespeichert.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::appointment_dto::CreateAppointmentRequest;
use crate::models::{Appointment, AppointmentStatus};
use crate::repositories::{AppointmentRepository, DriverRepository, TripRepository};
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::validation::{clean_stations, parse_date, parse_time};

pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    drivers: Arc<dyn DriverRepository>,
    trips: Arc<dyn TripRepository>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        drivers: Arc<dyn DriverRepository>,
        trips: Arc<dyn TripRepository>,
    ) -> Self {
        Self {
            appointments,
            drivers,
            trips,
        }
    }

    pub async fn create(&self, mut request: CreateAppointmentRequest) -> AppResult<Appointment> {
        request.normalize();
        request.validate()?;

        let driver_id = request.driver_id.unwrap_or_default();
        let driver = self
            .drivers
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| not_found_error("Fahrer", driver_id))?;

        if !driver.is_active() {
            return Err(validation_error(
                "driver_id",
                "Termine können nur aktiven Fahrern zugewiesen werden",
            ));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            driver_id: driver.id,
            driver_name: driver.name,
            date: parse_date("date", request.date.as_deref().unwrap_or_default())?,
            time: parse_time("time", request.time.as_deref().unwrap_or_default())?,
            start_location: request.start_location.unwrap_or_default(),
            stations: clean_stations(request.stations),
            end_location: request.end_location.unwrap_or_default(),
            purpose: request.purpose.unwrap_or_default(),
            status: AppointmentStatus::Pending,
            assigned_by: request.assigned_by.filter(|a| !a.is_empty()),
            assigned_at: Utc::now(),
        };

        let created = self.appointments.create(&appointment).await?;
        tracing::info!(appointment_id = %created.id, driver_id = %created.driver_id, "appointment assigned");
        Ok(created)
    }

    pub async fn list(&self, driver_id: Option<Uuid>) -> AppResult<Vec<Appointment>> {
        self.appointments.list(driver_id).await
    }

    /// Antwort des Fahrers; nur aus `pending` heraus möglich
    pub async fn respond(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        if status == AppointmentStatus::Pending {
            return Err(validation_error(
                "status",
                "Status muss 'accepted' oder 'declined' sein",
            ));
        }

        let updated = self
            .appointments
            .answer(id, status)
            .await?
            .ok_or_else(|| not_found_error("Termin", id))?;

        tracing::info!(appointment_id = %id, status = ?status, "appointment answered");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.appointments.delete(id).await? {
            return Err(not_found_error("Termin", id));
        }
        tracing::info!(appointment_id = %id, "appointment deleted");
        Ok(())
    }

    /// Angenommene Termine des Fahrers, zu denen noch keine Fahrt existiert
    pub async fn scheduled(&self, driver_id: Uuid) -> AppResult<Vec<Appointment>> {
        let used = self.trips.referenced_appointment_ids(driver_id).await?;
        let appointments = self.appointments.list(Some(driver_id)).await?;
        Ok(appointments
            .into_iter()
            .filter(|a| a.status == AppointmentStatus::Accepted && !used.contains(&a.id))
            .collect())
    }
}
