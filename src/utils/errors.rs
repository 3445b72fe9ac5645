//! Fehlerbehandlung
//!
//! Dieses Modul definiert alle Fehlertypen des Systems
//! und ihre Abbildung auf HTTP-Antworten.

use std::borrow::Cow;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Hauptfehler der Anwendung
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Ungültige Anfrage: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Ungültige Parameter: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Ungültige ID in der URL: {}", rejection.body_text()))
    }
}

/// Fehlerantwort der API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Interner Serverfehler", "INTERNAL_ERROR"),
                )
            }

            AppError::Validation(e) => {
                tracing::debug!(error = %e, "validation failed");
                let message = first_message(&e).unwrap_or_else(|| {
                    let fields = invalid_fields(&e);
                    format!("Pflichtfelder fehlen oder sind ungültig: {}", fields.join(", "))
                });
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: message,
                        code: "VALIDATION_ERROR",
                        details: Some(json!(e)),
                    },
                )
            }

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg, "BAD_REQUEST"),
            ),

            AppError::Unauthorized(msg) => {
                tracing::warn!("unauthorized: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(msg, "UNAUTHORIZED"),
                )
            }

            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse::new(msg, "FORBIDDEN")),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg, "NOT_FOUND")),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::new(msg, "CONFLICT")),

            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Interner Serverfehler", "INTERNAL_ERROR"),
                )
            }

            AppError::Hash(msg) => {
                tracing::error!("hash error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Interner Serverfehler", "INTERNAL_ERROR"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Typisiertes Ergebnis für Operationen, die fehlschlagen können
pub type AppResult<T> = Result<T, AppError>;

/// Erste explizit gesetzte Meldung aus den Feldfehlern
fn first_message(errors: &validator::ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
}

/// Ungültige Felder in API-Schreibweise (camelCase), sortiert
fn invalid_fields(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| to_camel_case(field))
        .collect();
    fields.sort();
    fields
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Validierungsfehler für ein einzelnes Feld mit deutscher Meldung
pub fn validation_error(field: &'static str, message: impl Into<Cow<'static, str>>) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("invalid");
    error.message = Some(message.into());

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} mit ID '{}' nicht gefunden", resource, id))
}

pub fn conflict_error(message: impl Into<String>) -> AppError {
    AppError::Conflict(message.into())
}

pub fn forbidden_error(message: impl Into<String>) -> AppError {
    AppError::Forbidden(message.into())
}

pub fn bad_request_error(message: impl Into<String>) -> AppError {
    AppError::BadRequest(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("business_partner"), "businessPartner");
        assert_eq!(to_camel_case("purpose"), "purpose");
        assert_eq!(to_camel_case("start_km"), "startKm");
    }

    #[test]
    fn test_validation_error_keeps_message() {
        match validation_error("detour_reason", "Begründung für den Umweg fehlt") {
            AppError::Validation(errors) => {
                assert_eq!(
                    first_message(&errors).as_deref(),
                    Some("Begründung für den Umweg fehlt")
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
