//! Request- und Response-Typen der HTTP-Schnittstelle

pub mod appointment_dto;
pub mod auth_dto;
pub mod driver_dto;
pub mod stats_dto;
pub mod trip_dto;
