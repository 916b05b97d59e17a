//! SQLite prescription repository implementation.

use carebase_core::repository::prescription::PrescriptionRepository;
use carebase_types::error::RepositoryError;
use carebase_types::visit::Prescription;
use chrono::NaiveDate;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_date, map_sqlx_error, parse_date};

/// SQLite-backed implementation of `PrescriptionRepository`.
pub struct SqlitePrescriptionRepository {
    pool: DatabasePool,
}

impl SqlitePrescriptionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn prescription_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Prescription, RepositoryError> {
    let read = |e: sqlx::Error| RepositoryError::Query(e.to_string());
    let date: String = row.try_get("date").map_err(read)?;
    Ok(Prescription {
        patient_id: row.try_get("patient_id").map_err(read)?,
        doctor_id: row.try_get("doctor_id").map_err(read)?,
        date: parse_date(&date)?,
        diagnosis: row.try_get("diagnosis").map_err(read)?,
        medicine_prescribed: row.try_get("medicine_prescribed").map_err(read)?,
    })
}

impl PrescriptionRepository for SqlitePrescriptionRepository {
    async fn upsert(&self, prescription: &Prescription) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO prescriptions (patient_id, doctor_id, date, diagnosis, medicine_prescribed)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (patient_id, doctor_id, date) DO UPDATE SET
                 diagnosis = excluded.diagnosis,
                 medicine_prescribed = excluded.medicine_prescribed",
        )
        .bind(prescription.patient_id)
        .bind(prescription.doctor_id)
        .bind(format_date(prescription.date))
        .bind(&prescription.diagnosis)
        .bind(&prescription.medicine_prescribed)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Prescription>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM prescriptions WHERE patient_id = ? AND doctor_id = ? AND date = ?",
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(format_date(date))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(prescription_from_row).transpose()
    }
}
