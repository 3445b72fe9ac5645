use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;

use crate::dto::stats_dto::DashboardStats;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppQuery;
use crate::utils::validation::parse_uuid;

pub fn create_stats_router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsQuery {
    driver_id: Option<String>,
}

async fn get_stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StatsQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let driver_id = match query.driver_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(parse_uuid("driver_id", id)?),
        _ => None,
    };
    let stats = state.dashboard_service().stats(driver_id).await?;
    Ok(Json(stats))
}
