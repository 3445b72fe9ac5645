//! Gemeinsamer Anwendungszustand
//!
//! Wird an alle Handler des Routers übergeben. Die Repositories liegen als
//! Trait-Objekte vor, damit PostgreSQL und In-Memory austauschbar sind.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::repositories::{
    AppointmentRepository, DriverRepository, MemoryStore, PgAppointmentRepository,
    PgDriverRepository, PgTripRepository, PgUserRepository, TripRepository, UserRepository,
};
use crate::services::{
    AppointmentService, AuthService, Clock, DashboardService, DriverService, ExportService,
    SystemClock, TripLifecycle,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub drivers: Arc<dyn DriverRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn with_postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            config,
            drivers: Arc::new(PgDriverRepository::new(pool.clone())),
            trips: Arc::new(PgTripRepository::new(pool.clone())),
            appointments: Arc::new(PgAppointmentRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn in_memory(config: EnvironmentConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            config,
            drivers: store.clone(),
            trips: store.clone(),
            appointments: store.clone(),
            users: store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Ersetzt die Zeitquelle, z.B. durch eine `ManualClock` in Tests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn trip_lifecycle(&self) -> TripLifecycle {
        TripLifecycle::new(
            self.trips.clone(),
            self.drivers.clone(),
            self.appointments.clone(),
            self.clock.clone(),
        )
    }

    pub fn driver_service(&self) -> DriverService {
        DriverService::new(self.drivers.clone())
    }

    pub fn appointment_service(&self) -> AppointmentService {
        AppointmentService::new(
            self.appointments.clone(),
            self.drivers.clone(),
            self.trips.clone(),
        )
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.drivers.clone(), self.users.clone())
    }

    pub fn export_service(&self) -> ExportService {
        ExportService::new(self.trips.clone())
    }

    pub fn dashboard_service(&self) -> DashboardService {
        DashboardService::new(
            self.drivers.clone(),
            self.trips.clone(),
            self.appointments.clone(),
        )
    }
}
