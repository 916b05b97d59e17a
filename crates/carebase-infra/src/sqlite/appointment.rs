//! SQLite appointment repository implementation.

use carebase_core::repository::appointment::AppointmentRepository;
use carebase_types::error::RepositoryError;
use carebase_types::visit::Appointment;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_date, map_sqlx_error, parse_date};

/// SQLite-backed implementation of `AppointmentRepository`.
pub struct SqliteAppointmentRepository {
    pool: DatabasePool,
}

impl SqliteAppointmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl AppointmentRepository for SqliteAppointmentRepository {
    async fn upsert(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        // The composite key carries every column, so a conflicting insert
        // has nothing to update; DO NOTHING keeps the upsert idempotent.
        sqlx::query(
            "INSERT INTO appointments (patient_id, doctor_id, appointment_date)
             VALUES (?, ?, ?)
             ON CONFLICT (patient_id, doctor_id, appointment_date) DO NOTHING",
        )
        .bind(appointment.patient_id)
        .bind(appointment.doctor_id)
        .bind(format_date(appointment.appointment_date))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM appointments WHERE patient_id = ?
             ORDER BY appointment_date, doctor_id",
        )
        .bind(patient_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let read = |e: sqlx::Error| RepositoryError::Query(e.to_string());
        rows.iter()
            .map(|row| {
                let date: String = row.try_get("appointment_date").map_err(read)?;
                Ok(Appointment {
                    patient_id: row.try_get("patient_id").map_err(read)?,
                    doctor_id: row.try_get("doctor_id").map_err(read)?,
                    appointment_date: parse_date(&date)?,
                })
            })
            .collect()
    }
}
