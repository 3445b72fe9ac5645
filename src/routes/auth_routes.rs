use axum::{extract::State, routing::post, Json, Router};

use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.auth_service().login(request).await?;
    Ok(Json(response))
}
