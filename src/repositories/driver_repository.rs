use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::DriverRepository;
use crate::models::{Driver, DriverStatus};
use crate::utils::errors::{conflict_error, AppError, AppResult};

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn create(&self, driver: &Driver) -> AppResult<Driver> {
        sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, name, employee_number, status, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(driver.id)
        .bind(&driver.name)
        .bind(&driver.employee_number)
        .bind(driver.status)
        .bind(driver.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => conflict_error(format!(
                "Personalnummer '{}' ist bereits vergeben",
                driver.employee_number
            )),
            other => AppError::Database(other),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>("SELECT * FROM drivers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    async fn find_active_by_credentials(
        &self,
        name: &str,
        employee_number: &str,
    ) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE name = $1 AND employee_number = $2 AND status = 'active'",
        )
        .bind(name)
        .bind(employee_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    async fn employee_number_exists(&self, employee_number: &str) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM drivers WHERE employee_number = $1)")
                .bind(employee_number)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn list(&self) -> AppResult<Vec<Driver>> {
        let drivers =
            sqlx::query_as::<_, Driver>("SELECT * FROM drivers ORDER BY created_at DESC, id")
                .fetch_all(&self.pool)
                .await?;

        Ok(drivers)
    }

    async fn set_status(&self, id: Uuid, status: DriverStatus) -> AppResult<Option<Driver>> {
        let driver = sqlx::query_as::<_, Driver>(
            "UPDATE drivers SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }
}
