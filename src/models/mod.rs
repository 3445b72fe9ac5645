//! Datenmodelle
//!
//! Die Structs bilden die PostgreSQL-Tabellen direkt ab.

pub mod appointment;
pub mod driver;
pub mod trip;
pub mod trip_log;
pub mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use driver::{Driver, DriverStatus};
pub use trip::{SortDirection, Trip, TripDetails, TripFilter, TripStatus, EDIT_WINDOW_DAYS};
pub use trip_log::{ChangeType, TripLog};
pub use user::User;
