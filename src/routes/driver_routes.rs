use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use uuid::Uuid;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverStatusRequest};
use crate::models::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppPath};

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", patch(update_driver_status))
}

async fn create_driver(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateDriverRequest>,
) -> Result<(StatusCode, Json<Driver>), AppError> {
    let driver = state.driver_service().create(request).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<Driver>>, AppError> {
    let drivers = state.driver_service().list().await?;
    Ok(Json(drivers))
}

async fn update_driver_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateDriverStatusRequest>,
) -> Result<Json<Driver>, AppError> {
    let driver = state.driver_service().set_status(id, request.status).await?;
    Ok(Json(driver))
}
