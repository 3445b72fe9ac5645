//! Abbildung von `AppError` auf HTTP-Antworten.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use common::body_json;
use fahrtenbuch::utils::errors::{
    conflict_error, forbidden_error, not_found_error, validation_error, AppError,
};

#[tokio::test]
async fn status_codes_follow_the_error_taxonomy() {
    let cases = [
        (validation_error("purpose", "Zweck fehlt"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        (AppError::BadRequest("kaputt".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        (AppError::Unauthorized("nein".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        (forbidden_error("gesperrt"), StatusCode::FORBIDDEN, "FORBIDDEN"),
        (not_found_error("Fahrt", "42"), StatusCode::NOT_FOUND, "NOT_FOUND"),
        (conflict_error("doppelt"), StatusCode::CONFLICT, "CONFLICT"),
        (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    ];

    for (error, status, code) in cases {
        let response = error.into_response();
        assert_eq!(response.status(), status);
        assert_eq!(body_json(response).await["code"], code);
    }
}

#[tokio::test]
async fn internal_errors_do_not_leak_details() {
    let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Interner Serverfehler");

    let response = AppError::Hash("bcrypt cost".into()).into_response();
    let body = body_json(response).await;
    assert!(!body["error"].as_str().unwrap().contains("bcrypt"));
}

#[tokio::test]
async fn messages_are_german() {
    let response = not_found_error("Fahrt", "42").into_response();
    assert_eq!(body_json(response).await["error"], "Fahrt mit ID '42' nicht gefunden");

    let response = validation_error("detour_reason", "Für einen Umweg ist eine Begründung erforderlich")
        .into_response();
    let body = body_json(response).await;
    assert_eq!(body["error"], "Für einen Umweg ist eine Begründung erforderlich");
    assert!(body["details"].is_object());
}
