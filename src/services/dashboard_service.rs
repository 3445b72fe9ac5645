//! Kennzahlen für Admin- und Fahrer-Dashboard

use std::sync::Arc;

use uuid::Uuid;

use crate::dto::stats_dto::DashboardStats;
use crate::models::{AppointmentStatus, TripFilter, TripStatus};
use crate::repositories::{AppointmentRepository, DriverRepository, TripRepository};
use crate::utils::errors::AppResult;

pub struct DashboardService {
    drivers: Arc<dyn DriverRepository>,
    trips: Arc<dyn TripRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl DashboardService {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        trips: Arc<dyn TripRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            drivers,
            trips,
            appointments,
        }
    }

    /// Mit `driver_id` nur die Fahrten und Termine dieses Fahrers
    pub async fn stats(&self, driver_id: Option<Uuid>) -> AppResult<DashboardStats> {
        let trips = self
            .trips
            .list(&TripFilter {
                driver_id,
                ..TripFilter::default()
            })
            .await?;
        let drivers = self.drivers.list().await?;
        let appointments = self.appointments.list(driver_id).await?;

        let completed_trips = trips
            .iter()
            .filter(|t| t.details.status == TripStatus::Completed)
            .count();

        Ok(DashboardStats {
            total_trips: trips.len(),
            completed_trips,
            active_trips: trips.len() - completed_trips,
            total_km: trips
                .iter()
                .filter_map(|t| t.details.total_distance)
                .map(i64::from)
                .sum(),
            registered_drivers: drivers.len(),
            active_drivers: drivers.iter().filter(|d| d.is_active()).count(),
            pending_appointments: appointments
                .iter()
                .filter(|a| a.status == AppointmentStatus::Pending)
                .count(),
        })
    }
}
