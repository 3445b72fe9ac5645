//! Fahrerverwaltung
//!
//! Anlegen, Auflisten und (De-)Aktivieren von Fahrern. Die Personalnummer
//! ist der fachliche Schlüssel und darf nur einmal vorkommen.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::CreateDriverRequest;
use crate::models::{Driver, DriverStatus};
use crate::repositories::DriverRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

pub struct DriverService {
    repository: Arc<dyn DriverRepository>,
}

impl DriverService {
    pub fn new(repository: Arc<dyn DriverRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, mut request: CreateDriverRequest) -> AppResult<Driver> {
        request.normalize();
        request.validate()?;

        let name = request.name.unwrap_or_default();
        let employee_number = request.employee_number.unwrap_or_default();

        if self.repository.employee_number_exists(&employee_number).await? {
            return Err(conflict_error(format!(
                "Personalnummer '{}' ist bereits vergeben",
                employee_number
            )));
        }

        let driver = self
            .repository
            .create(&Driver::new(name, employee_number))
            .await?;

        tracing::info!(driver_id = %driver.id, employee_number = %driver.employee_number, "driver registered");
        Ok(driver)
    }

    pub async fn list(&self) -> AppResult<Vec<Driver>> {
        self.repository.list().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Driver> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Fahrer", id))
    }

    pub async fn set_status(&self, id: Uuid, status: DriverStatus) -> AppResult<Driver> {
        let driver = self
            .repository
            .set_status(id, status)
            .await?
            .ok_or_else(|| not_found_error("Fahrer", id))?;

        tracing::info!(driver_id = %id, status = ?status, "driver status changed");
        Ok(driver)
    }
}
