use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::TripRepository;
use crate::models::{Trip, TripDetails, TripFilter, TripLog};
use crate::utils::errors::{not_found_error, AppResult};

/// Fachliche Spalten, identisch in `trips` und `trip_logs`
const DETAIL_COLUMNS: &str = "driver_id, driver_name, date, time, start_location, stations, \
     end_location, purpose, business_partner, detour_reason, status, start_km, end_km, \
     total_distance, start_time, end_time, appointment_id";

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Bindet die 17 fachlichen Spalten in der Reihenfolge von `DETAIL_COLUMNS`
fn bind_details<'q>(
    query: Query<'q, Postgres, PgArguments>,
    d: &'q TripDetails,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(d.driver_id)
        .bind(&d.driver_name)
        .bind(d.date)
        .bind(d.time)
        .bind(&d.start_location)
        .bind(&d.stations)
        .bind(&d.end_location)
        .bind(&d.purpose)
        .bind(&d.business_partner)
        .bind(&d.detour_reason)
        .bind(d.status)
        .bind(d.start_km)
        .bind(d.end_km)
        .bind(d.total_distance)
        .bind(d.start_time)
        .bind(d.end_time)
        .bind(d.appointment_id)
}

fn insert_log_sql() -> String {
    format!(
        "INSERT INTO trip_logs (id, trip_id, {DETAIL_COLUMNS}, trip_created_at, change_type, changed_by, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, \
         $20, $21, $22, $23)"
    )
}

async fn insert_log(
    conn: &mut sqlx::PgConnection,
    log: &TripLog,
) -> Result<(), sqlx::Error> {
    let sql = insert_log_sql();
    let query = sqlx::query(&sql).bind(log.id).bind(log.trip_id);
    bind_details(query, &log.snapshot)
        .bind(log.trip_created_at)
        .bind(log.change_type)
        .bind(&log.changed_by)
        .bind(log.created_at)
        .execute(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn insert_with_log(&self, trip: &Trip, log: &TripLog) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO trips (id, {DETAIL_COLUMNS}, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)"
        );
        bind_details(sqlx::query(&sql).bind(trip.id), &trip.details)
            .bind(trip.created_at)
            .execute(&mut *tx)
            .await?;

        insert_log(&mut *tx, log).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn update_with_log(&self, trip: &Trip, log: &TripLog) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        insert_log(&mut *tx, log).await?;

        let sql = "UPDATE trips SET driver_id = $2, driver_name = $3, date = $4, time = $5, \
             start_location = $6, stations = $7, end_location = $8, purpose = $9, \
             business_partner = $10, detour_reason = $11, status = $12, start_km = $13, \
             end_km = $14, total_distance = $15, start_time = $16, end_time = $17, \
             appointment_id = $18 \
             WHERE id = $1";
        let result = bind_details(sqlx::query(sql).bind(trip.id), &trip.details)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Verworfen beim Drop, der Protokolleintrag wird nie sichtbar
            return Err(not_found_error("Fahrt", trip.id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_with_log(&self, id: Uuid, log: &TripLog) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        insert_log(&mut *tx, log).await?;

        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Fahrt", id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    async fn list(&self, filter: &TripFilter) -> AppResult<Vec<Trip>> {
        let dir = filter.direction.as_sql();
        let sql = format!(
            "SELECT * FROM trips \
             WHERE ($1::uuid IS NULL OR driver_id = $1) \
               AND ($2::date IS NULL OR date >= $2) \
               AND ($3::date IS NULL OR date <= $3) \
             ORDER BY date {dir}, created_at {dir}, id {dir}"
        );

        let trips = sqlx::query_as::<_, Trip>(&sql)
            .bind(filter.driver_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;

        Ok(trips)
    }

    async fn referenced_appointment_ids(&self, driver_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT appointment_id FROM trips WHERE driver_id = $1 AND appointment_id IS NOT NULL",
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn logs_for_trips(&self, trip_ids: &[Uuid]) -> AppResult<Vec<TripLog>> {
        if trip_ids.is_empty() {
            return Ok(Vec::new());
        }

        let logs = sqlx::query_as::<_, TripLog>(
            "SELECT * FROM trip_logs WHERE trip_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(trip_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
