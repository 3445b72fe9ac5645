use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::models::{SortDirection, TripFilter, TripStatus};
use crate::utils::errors::AppResult;
use crate::utils::validation::{parse_date, parse_uuid, trim_opt};

/// Request zum Anlegen einer Fahrt
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[validate(required)]
    pub driver_id: Option<Uuid>,

    #[validate(required, length(min = 1))]
    pub driver_name: Option<String>,

    #[validate(required, length(min = 1))]
    pub date: Option<String>,

    pub time: Option<String>,

    #[validate(required, length(min = 1))]
    pub start_location: Option<String>,

    #[serde(default)]
    pub stations: Vec<String>,

    #[validate(required, length(min = 1))]
    pub end_location: Option<String>,

    #[validate(required, length(min = 1))]
    pub purpose: Option<String>,

    #[validate(required, length(min = 1))]
    pub business_partner: Option<String>,

    /// Umweg gefahren; dann ist eine Begründung Pflicht
    #[serde(default)]
    pub detour: bool,

    #[validate(length(min = 1))]
    pub detour_reason: Option<String>,

    pub status: Option<TripStatus>,

    pub start_km: Option<Value>,
    pub end_km: Option<Value>,
    pub total_distance: Option<Value>,

    pub start_time: Option<String>,
    pub end_time: Option<String>,

    pub appointment_id: Option<Uuid>,

    pub changed_by: Option<String>,
}

impl CreateTripRequest {
    pub fn normalize(&mut self) {
        for field in [
            &mut self.driver_name,
            &mut self.date,
            &mut self.time,
            &mut self.start_location,
            &mut self.end_location,
            &mut self.purpose,
            &mut self.business_partner,
            &mut self.detour_reason,
            &mut self.start_time,
            &mut self.end_time,
            &mut self.changed_by,
        ] {
            trim_opt(field);
        }
    }
}

/// Teiländerung einer Fahrt; fehlende Felder bleiben unverändert
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    #[validate(length(min = 1))]
    pub date: Option<String>,

    pub time: Option<String>,

    #[validate(length(min = 1))]
    pub start_location: Option<String>,

    pub stations: Option<Vec<String>>,

    #[validate(length(min = 1))]
    pub end_location: Option<String>,

    #[validate(length(min = 1))]
    pub purpose: Option<String>,

    #[validate(length(min = 1))]
    pub business_partner: Option<String>,

    /// `false` entfernt einen vorhandenen Umweg samt Begründung
    pub detour: Option<bool>,

    #[validate(length(min = 1))]
    pub detour_reason: Option<String>,

    pub status: Option<TripStatus>,

    pub start_km: Option<Value>,
    pub end_km: Option<Value>,
    pub total_distance: Option<Value>,

    pub start_time: Option<String>,
    pub end_time: Option<String>,

    pub changed_by: Option<String>,
}

impl UpdateTripRequest {
    pub fn normalize(&mut self) {
        for field in [
            &mut self.date,
            &mut self.time,
            &mut self.start_location,
            &mut self.end_location,
            &mut self.purpose,
            &mut self.business_partner,
            &mut self.detour_reason,
            &mut self.start_time,
            &mut self.end_time,
            &mut self.changed_by,
        ] {
            trim_opt(field);
        }
    }
}

/// Query für Listen und Exporte: `?driverId=&from=&to=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripQuery {
    pub driver_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TripQuery {
    /// Leere Parameter zählen als nicht gesetzt
    pub fn into_filter(self, direction: SortDirection) -> AppResult<TripFilter> {
        fn present(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }

        Ok(TripFilter {
            driver_id: present(self.driver_id)
                .map(|v| parse_uuid("driver_id", &v))
                .transpose()?,
            from: present(self.from).map(|v| parse_date("from", &v)).transpose()?,
            to: present(self.to).map(|v| parse_date("to", &v)).transpose()?,
            direction,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTripQuery {
    pub changed_by: Option<String>,
}
