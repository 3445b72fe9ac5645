use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::appointment_dto::{
    AppointmentQuery, CreateAppointmentRequest, UpdateAppointmentStatusRequest,
};
use crate::models::Appointment;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath, AppQuery};
use crate::utils::validation::parse_uuid;

pub fn create_appointment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/:id", patch(respond_to_appointment).delete(delete_appointment))
}

async fn create_appointment(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.appointment_service().create(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn list_appointments(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AppointmentQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let driver_id = match query.driver_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Some(parse_uuid("driver_id", id)?),
        _ => None,
    };
    let appointments = state.appointment_service().list(driver_id).await?;
    Ok(Json(appointments))
}

async fn respond_to_appointment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateAppointmentStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state
        .appointment_service()
        .respond(id, request.status)
        .await?;
    Ok(Json(appointment))
}

async fn delete_appointment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.appointment_service().delete(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Termin gelöscht"
    })))
}
