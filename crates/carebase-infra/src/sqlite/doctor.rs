//! SQLite doctor repository implementation.

use carebase_core::repository::doctor::DoctorRepository;
use carebase_types::doctor::Doctor;
use carebase_types::error::RepositoryError;
use sqlx::Row;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `DoctorRepository`.
pub struct SqliteDoctorRepository {
    pool: DatabasePool,
}

impl SqliteDoctorRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl DoctorRepository for SqliteDoctorRepository {
    async fn upsert(&self, doctor: &Doctor) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO doctors (doctor_id, doctor_name, specialty)
             VALUES (?, ?, ?)
             ON CONFLICT (doctor_id) DO UPDATE SET
                 doctor_name = excluded.doctor_name,
                 specialty = excluded.specialty",
        )
        .bind(doctor.doctor_id)
        .bind(&doctor.doctor_name)
        .bind(&doctor.specialty)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, doctor_id: i64) -> Result<Option<Doctor>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM doctors WHERE doctor_id = ?")
            .bind(doctor_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let read = |e: sqlx::Error| RepositoryError::Query(e.to_string());
        row.map(|row| {
            Ok(Doctor {
                doctor_id: row.try_get("doctor_id").map_err(read)?,
                doctor_name: row.try_get("doctor_name").map_err(read)?,
                specialty: row.try_get("specialty").map_err(read)?,
            })
        })
        .transpose()
    }
}
