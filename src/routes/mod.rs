//! HTTP-Routen
//!
//! Alle fachlichen Endpunkte liegen unter `/api`, `/health` außerhalb.

pub mod appointment_routes;
pub mod auth_routes;
pub mod driver_routes;
pub mod stats_routes;
pub mod trip_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_routes::create_auth_router())
        .nest("/drivers", driver_routes::create_driver_router())
        .nest("/trips", trip_routes::create_trip_router())
        .nest("/appointments", appointment_routes::create_appointment_router())
        .nest("/stats", stats_routes::create_stats_router());

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
