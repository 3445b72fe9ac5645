//! Fahrtenbuch-Backend
//!
//! Fahrten mit Bearbeitungsfenster und lückenlosem Änderungsprotokoll,
//! Fahrerverwaltung, Termine, Anmeldung und CSV/PDF-Export.

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
