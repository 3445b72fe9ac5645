use serde::Deserialize;
use validator::Validate;

use crate::models::DriverStatus;
use crate::utils::validation::trim_opt;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(required, length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(required, length(min = 1, max = 50))]
    pub employee_number: Option<String>,
}

impl CreateDriverRequest {
    pub fn normalize(&mut self) {
        trim_opt(&mut self.name);
        trim_opt(&mut self.employee_number);
    }
}

/// Nur der Status ist änderbar, die Personalnummer nie
#[derive(Debug, Deserialize)]
pub struct UpdateDriverStatusRequest {
    pub status: DriverStatus,
}
