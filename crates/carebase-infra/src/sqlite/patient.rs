//! SQLite patient repository implementation.
//!
//! Implements `PatientRepository` from `carebase-core` using sqlx with
//! split read/write pools.

use carebase_core::repository::patient::PatientRepository;
use carebase_types::error::RepositoryError;
use carebase_types::patient::{CreatePatientRequest, Patient};
use sqlx::Row;

use super::map_sqlx_error;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `PatientRepository`.
pub struct SqlitePatientRepository {
    pool: DatabasePool,
}

impl SqlitePatientRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn patient_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Patient, RepositoryError> {
    let read = |e: sqlx::Error| RepositoryError::Query(e.to_string());
    Ok(Patient {
        id: row.try_get("id").map_err(read)?,
        name: row.try_get("name").map_err(read)?,
        gender: row.try_get("gender").map_err(read)?,
        height_cm: row.try_get("height_cm").map_err(read)?,
        weight_kg: row.try_get("weight_kg").map_err(read)?,
        bmi: row.try_get("bmi").map_err(read)?,
        medical_history: row.try_get("medical_history").map_err(read)?,
    })
}

impl PatientRepository for SqlitePatientRepository {
    async fn create(&self, request: &CreatePatientRequest) -> Result<Patient, RepositoryError> {
        let result = match request.id {
            Some(id) => {
                sqlx::query(
                    "INSERT INTO patients (id, name, gender, height_cm, weight_kg, bmi, medical_history)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(id)
                .bind(&request.name)
                .bind(&request.gender)
                .bind(request.height_cm)
                .bind(request.weight_kg)
                .bind(request.bmi)
                .bind(&request.medical_history)
                .execute(&self.pool.writer)
                .await
            }
            None => {
                sqlx::query(
                    "INSERT INTO patients (name, gender, height_cm, weight_kg, bmi, medical_history)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&request.name)
                .bind(&request.gender)
                .bind(request.height_cm)
                .bind(request.weight_kg)
                .bind(request.bmi)
                .bind(&request.medical_history)
                .execute(&self.pool.writer)
                .await
            }
        };

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                return Err(RepositoryError::Conflict(format!(
                    "patient id {:?} already exists",
                    request.id
                )));
            }
            Err(e) => return Err(map_sqlx_error(e)),
        };

        let id = request.id.unwrap_or_else(|| result.last_insert_rowid());
        Ok(Patient {
            id,
            name: request.name.clone(),
            gender: request.gender.clone(),
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            bmi: request.bmi,
            medical_history: request.medical_history.clone(),
        })
    }

    async fn upsert(&self, patient: &Patient) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO patients (id, name, gender, height_cm, weight_kg, bmi, medical_history)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 name = excluded.name,
                 gender = excluded.gender,
                 height_cm = excluded.height_cm,
                 weight_kg = excluded.weight_kg,
                 bmi = excluded.bmi,
                 medical_history = excluded.medical_history",
        )
        .bind(patient.id)
        .bind(&patient.name)
        .bind(&patient.gender)
        .bind(patient.height_cm)
        .bind(patient.weight_kg)
        .bind(patient.bmi)
        .bind(&patient.medical_history)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Patient>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM patients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(patient_from_row).transpose()
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Patient>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM patients ORDER BY id LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        rows.iter().map(patient_from_row).collect()
    }

    async fn update(&self, patient: &Patient) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE patients SET name = ?, gender = ?, height_cm = ?, weight_kg = ?, bmi = ?, medical_history = ?
             WHERE id = ?",
        )
        .bind(&patient.name)
        .bind(&patient.gender)
        .bind(patient.height_cm)
        .bind(patient.weight_kg)
        .bind(patient.bmi)
        .bind(&patient.medical_history)
        .bind(patient.id)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;

    fn create_request(name: &str) -> CreatePatientRequest {
        CreatePatientRequest {
            id: None,
            name: name.to_string(),
            gender: "F".to_string(),
            height_cm: 170.0,
            weight_kg: 62.0,
            bmi: 21.5,
            medical_history: Some("asthma".to_string()),
        }
    }

    fn make_patient(id: i64, name: &str) -> Patient {
        Patient {
            id,
            name: name.to_string(),
            gender: "M".to_string(),
            height_cm: 180.0,
            weight_kg: 75.0,
            bmi: 23.1,
            medical_history: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_round_trips() {
        let repo = SqlitePatientRepository::new(test_pool().await);

        let created = repo.create(&create_request("Ada Gray")).await.unwrap();
        assert!(created.id > 0);

        let found = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.medical_history.as_deref(), Some("asthma"));
    }

    #[tokio::test]
    async fn test_create_with_supplied_id_conflicts_on_reuse() {
        let repo = SqlitePatientRepository::new(test_pool().await);
        let mut request = create_request("Ada Gray");
        request.id = Some(42);

        let created = repo.create(&request).await.unwrap();
        assert_eq!(created.id, 42);

        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let repo = SqlitePatientRepository::new(test_pool().await);
        let mut patient = make_patient(5, "Ben Cole");

        repo.upsert(&patient).await.unwrap();
        patient.weight_kg = 77.0;
        repo.upsert(&patient).await.unwrap();

        let all = repo.list(0, 100).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].weight_kg, 77.0);
    }

    #[tokio::test]
    async fn test_list_pages_in_id_order() {
        let repo = SqlitePatientRepository::new(test_pool().await);
        for id in [3, 1, 2] {
            repo.upsert(&make_patient(id, &format!("Patient {id}")))
                .await
                .unwrap();
        }

        let page = repo.list(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);

        let first = repo.list(0, 10).await.unwrap();
        let second = repo.list(0, 10).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = SqlitePatientRepository::new(test_pool().await);

        let err = repo.update(&make_patient(99, "Ghost")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = SqlitePatientRepository::new(test_pool().await);
        assert!(repo.get(12345).await.unwrap().is_none());
    }
}
