use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::trip_dto::{CreateTripRequest, DeleteTripQuery, TripQuery, UpdateTripRequest};
use crate::models::{Appointment, SortDirection, Trip, TripLog};
use crate::services::export_service::{CSV_FILENAME, PDF_FILENAME};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};
use crate::utils::extract::{AppJson, AppPath, AppQuery};
use crate::utils::validation::parse_uuid;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips).post(create_trip))
        .route("/export/csv", get(export_csv))
        .route("/export/pdf", get(export_pdf))
        .route("/scheduled", get(scheduled_trips))
        .route("/:id", get(get_trip).patch(update_trip).delete(delete_trip))
        .route("/:id/logs", get(trip_logs))
}

async fn create_trip(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let trip = state.trip_lifecycle().create(request).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn list_trips(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TripQuery>,
) -> Result<Json<Vec<Trip>>, AppError> {
    let filter = query.into_filter(SortDirection::Descending)?;
    let trips = state.trip_lifecycle().list(&filter).await?;
    Ok(Json(trips))
}

async fn get_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.trip_lifecycle().get(id).await?;
    Ok(Json(trip))
}

async fn update_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<UpdateTripRequest>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.trip_lifecycle().update(id, patch).await?;
    Ok(Json(trip))
}

async fn delete_trip(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(query): AppQuery<DeleteTripQuery>,
) -> Result<Json<Value>, AppError> {
    state
        .trip_lifecycle()
        .delete(id, query.changed_by.as_deref())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Fahrt gelöscht"
    })))
}

async fn trip_logs(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<TripLog>>, AppError> {
    let logs = state.trip_lifecycle().logs(id).await?;
    Ok(Json(logs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduledQuery {
    driver_id: Option<String>,
}

async fn scheduled_trips(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ScheduledQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let driver_id = match query.driver_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => parse_uuid("driver_id", id)?,
        _ => return Err(validation_error("driver_id", "driverId ist erforderlich")),
    };
    let appointments = state.appointment_service().scheduled(driver_id).await?;
    Ok(Json(appointments))
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

async fn export_csv(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TripQuery>,
) -> Result<Response, AppError> {
    let filter = query.into_filter(SortDirection::Ascending)?;
    let body = state.export_service().csv(&filter).await?;
    Ok(attachment("text/csv; charset=utf-8", CSV_FILENAME, body))
}

async fn export_pdf(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TripQuery>,
) -> Result<Response, AppError> {
    let filter = query.into_filter(SortDirection::Ascending)?;
    let body = state.export_service().pdf(&filter).await?;
    Ok(attachment("application/pdf", PDF_FILENAME, body))
}
