//! Extraktoren, deren Ablehnungen als `AppError` beantwortet werden

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::utils::errors::AppError;

/// JSON-Body; fehlerhafte Bodies ergeben 400 statt 422
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query-Parameter mit derselben Fehlerabbildung
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Pfadparameter; eine ungültige UUID ergibt 400 im einheitlichen Format
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
