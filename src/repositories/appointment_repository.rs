use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::AppointmentRepository;
use crate::models::{Appointment, AppointmentStatus};
use crate::utils::errors::{conflict_error, AppResult};

pub struct PgAppointmentRepository {
    pool: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> AppResult<Appointment> {
        let created = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, driver_id, driver_name, date, time, start_location, stations,
                end_location, purpose, status, assigned_by, assigned_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.driver_id)
        .bind(&appointment.driver_name)
        .bind(appointment.date)
        .bind(appointment.time)
        .bind(&appointment.start_location)
        .bind(&appointment.stations)
        .bind(&appointment.end_location)
        .bind(&appointment.purpose)
        .bind(appointment.status)
        .bind(&appointment.assigned_by)
        .bind(appointment.assigned_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(appointment)
    }

    async fn list(&self, driver_id: Option<Uuid>) -> AppResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE ($1::uuid IS NULL OR driver_id = $1)
            ORDER BY date, time, assigned_at
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn answer(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2 WHERE id = $1 AND status = 'pending' RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        if appointment.is_some() {
            return Ok(appointment);
        }

        // Kein Treffer: entweder unbekannt oder schon beantwortet
        if self.find_by_id(id).await?.is_some() {
            return Err(conflict_error("Der Termin wurde bereits beantwortet"));
        }
        Ok(None)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
