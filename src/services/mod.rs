//! Fachlogik
//!
//! Jeder Service arbeitet ausschließlich über die Repository-Traits und ist
//! damit unabhängig vom Speicher-Backend.

pub mod appointment_service;
pub mod audit_recorder;
pub mod auth_service;
pub mod clock;
pub mod dashboard_service;
pub mod driver_service;
pub mod export_service;
pub mod trip_lifecycle;

pub use appointment_service::AppointmentService;
pub use audit_recorder::{format_trail, AuditRecorder};
pub use auth_service::AuthService;
pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard_service::DashboardService;
pub use driver_service::DriverService;
pub use export_service::ExportService;
pub use trip_lifecycle::TripLifecycle;
