use serde::Serialize;

/// Kennzahlen für die Dashboards
#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_trips: usize,
    pub completed_trips: usize,
    pub active_trips: usize,
    pub total_km: i64,
    pub registered_drivers: usize,
    pub active_drivers: usize,
    pub pending_appointments: usize,
}
