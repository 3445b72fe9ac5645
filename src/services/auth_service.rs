//! Anmeldung
//!
//! Fahrer melden sich mit Name und Personalnummer an, Admins mit E-Mail und
//! Passwort (bcrypt). Es werden keine Sitzungen oder Tokens ausgegeben.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::dto::auth_dto::{LoginRequest, LoginResponse, Role};
use crate::models::User;
use crate::repositories::{DriverRepository, UserRepository};
use crate::utils::errors::{bad_request_error, AppError, AppResult};

pub struct AuthService {
    drivers: Arc<dyn DriverRepository>,
    users: Arc<dyn UserRepository>,
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AuthService {
    pub fn new(drivers: Arc<dyn DriverRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { drivers, users }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        match request {
            LoginRequest::Driver {
                name,
                employee_number,
            } => {
                let (Some(name), Some(employee_number)) = (present(name), present(employee_number))
                else {
                    return Err(bad_request_error("Name und Personalnummer erforderlich"));
                };

                let driver = self
                    .drivers
                    .find_active_by_credentials(&name, &employee_number)
                    .await?
                    .ok_or_else(|| {
                        AppError::Unauthorized("Fahrer nicht gefunden oder inaktiv".to_string())
                    })?;

                tracing::info!(driver_id = %driver.id, "driver logged in");
                Ok(LoginResponse {
                    id: driver.id.to_string(),
                    name: driver.name,
                    role: Role::Driver,
                })
            }
            LoginRequest::Admin { email, password } => {
                let (Some(email), Some(password)) = (present(email), password.filter(|p| !p.is_empty()))
                else {
                    return Err(bad_request_error("E-Mail und Passwort erforderlich"));
                };

                let user = self
                    .users
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| AppError::Unauthorized("Admin nicht gefunden".to_string()))?;

                let valid = verify(&password, &user.password_hash)
                    .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;
                if !valid {
                    return Err(AppError::Unauthorized("Falsches Passwort".to_string()));
                }

                tracing::info!(user_id = %user.id, "admin logged in");
                Ok(LoginResponse {
                    id: user.id.to_string(),
                    name: user.name,
                    role: Role::Admin,
                })
            }
        }
    }

    /// Legt den Admin an, sofern die E-Mail noch nicht existiert
    pub async fn seed_admin(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok(existing);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(&User::new(name.to_string(), email.to_string(), password_hash))
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "admin account created");
        Ok(user)
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
}
