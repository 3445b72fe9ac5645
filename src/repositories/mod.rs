//! Persistenzschicht
//!
//! Ein Trait pro Entität; die Services kennen nur die Traits. Es gibt eine
//! PostgreSQL-Implementierung und eine In-Memory-Implementierung für
//! Entwicklung und Tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, Driver, DriverStatus, Trip, TripFilter, TripLog, User,
};
use crate::utils::errors::AppResult;

pub mod appointment_repository;
pub mod driver_repository;
pub mod memory;
pub mod trip_repository;
pub mod user_repository;

pub use appointment_repository::PgAppointmentRepository;
pub use driver_repository::PgDriverRepository;
pub use memory::MemoryStore;
pub use trip_repository::PgTripRepository;
pub use user_repository::PgUserRepository;

#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Legt den Fahrer an; doppelte Personalnummer ergibt `Conflict`
    async fn create(&self, driver: &Driver) -> AppResult<Driver>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>>;

    /// Aktiver Fahrer mit exakt passendem Namen und Personalnummer
    async fn find_active_by_credentials(
        &self,
        name: &str,
        employee_number: &str,
    ) -> AppResult<Option<Driver>>;

    async fn employee_number_exists(&self, employee_number: &str) -> AppResult<bool>;

    /// Alle Fahrer, neueste zuerst
    async fn list(&self) -> AppResult<Vec<Driver>>;

    async fn set_status(&self, id: Uuid, status: DriverStatus) -> AppResult<Option<Driver>>;
}

/// Fahrten und ihr Änderungsprotokoll.
///
/// Die `*_with_log` Methoden schreiben Fahrt und Protokolleintrag in einer
/// Transaktion: entweder beides wird sichtbar oder nichts.
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn insert_with_log(&self, trip: &Trip, log: &TripLog) -> AppResult<()>;

    async fn update_with_log(&self, trip: &Trip, log: &TripLog) -> AppResult<()>;

    async fn delete_with_log(&self, id: Uuid, log: &TripLog) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>>;

    async fn list(&self, filter: &TripFilter) -> AppResult<Vec<Trip>>;

    /// IDs der Termine, die bereits von einer Fahrt referenziert werden
    async fn referenced_appointment_ids(&self, driver_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Protokolleinträge zu den Fahrten, älteste zuerst
    async fn logs_for_trips(&self, trip_ids: &[Uuid]) -> AppResult<Vec<TripLog>>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> AppResult<Appointment>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>>;

    /// Termine nach Datum und Uhrzeit, optional nur für einen Fahrer
    async fn list(&self, driver_id: Option<Uuid>) -> AppResult<Vec<Appointment>>;

    /// Setzt den Status nur, solange der Termin noch `pending` ist.
    ///
    /// `None` wenn der Termin nicht existiert, `Conflict` wenn er bereits
    /// beantwortet wurde. Prüfung und Schreiben sind eine atomare Operation.
    async fn answer(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Option<Appointment>>;

    /// `true`, wenn ein Termin entfernt wurde
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn create(&self, user: &User) -> AppResult<User>;
}
