use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::AppointmentStatus;
use crate::utils::validation::trim_opt;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[validate(required)]
    pub driver_id: Option<Uuid>,

    #[validate(required, length(min = 1))]
    pub date: Option<String>,

    #[validate(required, length(min = 1))]
    pub time: Option<String>,

    #[validate(required, length(min = 1))]
    pub start_location: Option<String>,

    #[serde(default)]
    pub stations: Vec<String>,

    #[validate(required, length(min = 1))]
    pub end_location: Option<String>,

    #[validate(required, length(min = 1))]
    pub purpose: Option<String>,

    pub assigned_by: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn normalize(&mut self) {
        for field in [
            &mut self.date,
            &mut self.time,
            &mut self.start_location,
            &mut self.end_location,
            &mut self.purpose,
            &mut self.assigned_by,
        ] {
            trim_opt(field);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub driver_id: Option<String>,
}

/// Antwort des Fahrers: nur `accepted` oder `declined`
#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}
