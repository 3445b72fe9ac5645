//! Hilfsmodule
//!
//! Fehlerbehandlung, Validierung und Extraktoren für die HTTP-Schicht.

pub mod errors;
pub mod extract;
pub mod validation;
