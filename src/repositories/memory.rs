//! In-Memory-Speicher
//!
//! Implementiert alle Repository-Traits über einem gemeinsamen Zustand
//! hinter einem `RwLock`. Wird mit `STORAGE=memory` und in den Tests
//! verwendet. Jede `*_with_log` Operation läuft unter einer einzigen
//! Schreibsperre und ist damit atomar.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AppointmentRepository, DriverRepository, TripRepository, UserRepository};
use crate::models::{
    Appointment, AppointmentStatus, Driver, DriverStatus, Trip, TripFilter, TripLog, User,
};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    drivers: HashMap<Uuid, Driver>,
    trips: HashMap<Uuid, Trip>,
    trip_logs: Vec<TripLog>,
    appointments: HashMap<Uuid, Appointment>,
    users: HashMap<Uuid, User>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anzahl aller Protokolleinträge, auch von gelöschten Fahrten
    pub async fn trip_log_count(&self) -> usize {
        self.state.read().await.trip_logs.len()
    }
}

#[async_trait]
impl DriverRepository for MemoryStore {
    async fn create(&self, driver: &Driver) -> AppResult<Driver> {
        let mut state = self.state.write().await;
        if state
            .drivers
            .values()
            .any(|d| d.employee_number == driver.employee_number)
        {
            return Err(conflict_error(format!(
                "Personalnummer '{}' ist bereits vergeben",
                driver.employee_number
            )));
        }
        state.drivers.insert(driver.id, driver.clone());
        Ok(driver.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.state.read().await.drivers.get(&id).cloned())
    }

    async fn find_active_by_credentials(
        &self,
        name: &str,
        employee_number: &str,
    ) -> AppResult<Option<Driver>> {
        let state = self.state.read().await;
        Ok(state
            .drivers
            .values()
            .find(|d| d.name == name && d.employee_number == employee_number && d.is_active())
            .cloned())
    }

    async fn employee_number_exists(&self, employee_number: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .drivers
            .values()
            .any(|d| d.employee_number == employee_number))
    }

    async fn list(&self) -> AppResult<Vec<Driver>> {
        let state = self.state.read().await;
        let mut drivers: Vec<Driver> = state.drivers.values().cloned().collect();
        drivers.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(drivers)
    }

    async fn set_status(&self, id: Uuid, status: DriverStatus) -> AppResult<Option<Driver>> {
        let mut state = self.state.write().await;
        Ok(state.drivers.get_mut(&id).map(|driver| {
            driver.status = status;
            driver.clone()
        }))
    }
}

#[async_trait]
impl TripRepository for MemoryStore {
    async fn insert_with_log(&self, trip: &Trip, log: &TripLog) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.trips.insert(trip.id, trip.clone());
        state.trip_logs.push(log.clone());
        Ok(())
    }

    async fn update_with_log(&self, trip: &Trip, log: &TripLog) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.trips.contains_key(&trip.id) {
            return Err(not_found_error("Fahrt", trip.id));
        }
        state.trip_logs.push(log.clone());
        state.trips.insert(trip.id, trip.clone());
        Ok(())
    }

    async fn delete_with_log(&self, id: Uuid, log: &TripLog) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.trips.remove(&id).is_none() {
            return Err(not_found_error("Fahrt", id));
        }
        state.trip_logs.push(log.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        Ok(self.state.read().await.trips.get(&id).cloned())
    }

    async fn list(&self, filter: &TripFilter) -> AppResult<Vec<Trip>> {
        let state = self.state.read().await;
        let mut trips: Vec<Trip> = state
            .trips
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        filter.sort(&mut trips);
        Ok(trips)
    }

    async fn referenced_appointment_ids(&self, driver_id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        Ok(state
            .trips
            .values()
            .filter(|t| t.details.driver_id == driver_id)
            .filter_map(|t| t.details.appointment_id)
            .collect())
    }

    async fn logs_for_trips(&self, trip_ids: &[Uuid]) -> AppResult<Vec<TripLog>> {
        let state = self.state.read().await;
        // trip_logs ist bereits in Einfügereihenfolge
        Ok(state
            .trip_logs
            .iter()
            .filter(|log| trip_ids.contains(&log.trip_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn create(&self, appointment: &Appointment) -> AppResult<Appointment> {
        let mut state = self.state.write().await;
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        Ok(self.state.read().await.appointments.get(&id).cloned())
    }

    async fn list(&self, driver_id: Option<Uuid>) -> AppResult<Vec<Appointment>> {
        let state = self.state.read().await;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| driver_id.map_or(true, |id| a.driver_id == id))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| {
            (a.date, a.time, a.assigned_at).cmp(&(b.date, b.time, b.assigned_at))
        });
        Ok(appointments)
    }

    async fn answer(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Option<Appointment>> {
        let mut state = self.state.write().await;
        let Some(appointment) = state.appointments.get_mut(&id) else {
            return Ok(None);
        };
        if appointment.status.is_terminal() {
            return Err(conflict_error("Der Termin wurde bereits beantwortet"));
        }
        appointment.status = status;
        Ok(Some(appointment.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.write().await.appointments.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &User) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(conflict_error(format!(
                "E-Mail '{}' ist bereits registriert",
                user.email
            )));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}
