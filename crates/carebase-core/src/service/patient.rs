//! Patient CRUD service.
//!
//! Every write that touches `medical_history` recomputes the history
//! embedding synchronously, so the vector index never lags the text column.

use carebase_types::error::PatientError;
use carebase_types::patient::{CreatePatientRequest, Patient, UpdatePatientRequest};

use crate::embedding::{Embedder, EmbeddingIndex};
use crate::repository::patient::PatientRepository;

/// Default page size for patient listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Service for patient CRUD.
pub struct PatientService<R: PatientRepository, E: Embedder, I: EmbeddingIndex> {
    repo: R,
    embedder: E,
    index: I,
}

impl<R: PatientRepository, E: Embedder, I: EmbeddingIndex> PatientService<R, E, I> {
    pub fn new(repo: R, embedder: E, index: I) -> Self {
        Self {
            repo,
            embedder,
            index,
        }
    }

    /// Create a patient and index its medical-history embedding.
    pub async fn create(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        validate_fields(&request.name, &request.gender, request.height_cm, request.weight_kg, request.bmi)?;

        // Embed before committing the row so an embedding failure leaves no
        // vector-less patient behind. An index upsert can still fail after
        // the write; the startup reload repairs that divergence.
        let embedding = self
            .embed_history(request.medical_history.clone().unwrap_or_default())
            .await?;

        let patient = self.repo.create(&request).await?;
        self.index.upsert_history(patient.id, &embedding).await?;

        tracing::debug!(patient_id = patient.id, "patient created");
        Ok(patient)
    }

    /// Fetch a single patient.
    pub async fn get(&self, id: i64) -> Result<Patient, PatientError> {
        self.repo.get(id).await?.ok_or(PatientError::NotFound)
    }

    /// List a page of patients. Negative paging values are a client error.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Patient>, PatientError> {
        if skip < 0 || limit < 0 {
            return Err(PatientError::Invalid(
                "skip and limit must be non-negative".to_string(),
            ));
        }
        Ok(self.repo.list(skip, limit).await?)
    }

    /// Apply a partial update. Unspecified fields are left untouched; the
    /// history embedding is refreshed only when the text field was supplied.
    /// A patch carrying no fields at all is a no-op returning the stored
    /// record.
    pub async fn update(
        &self,
        id: i64,
        patch: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        let mut patient = self.get(id).await?;
        if patch.is_empty() {
            return Ok(patient);
        }
        patch.apply(&mut patient);

        validate_fields(
            &patient.name,
            &patient.gender,
            patient.height_cm,
            patient.weight_kg,
            patient.bmi,
        )?;

        // Same ordering as create: embed before writing.
        let embedding = match patch.medical_history.is_some() {
            true => Some(
                self.embed_history(patient.medical_history.clone().unwrap_or_default())
                    .await?,
            ),
            false => None,
        };

        self.repo.update(&patient).await?;

        if let Some(embedding) = embedding {
            self.index.upsert_history(patient.id, &embedding).await?;
        }

        tracing::debug!(patient_id = id, "patient updated");
        Ok(patient)
    }

    /// Embed a medical-history text (empty string when absent).
    async fn embed_history(&self, text: String) -> Result<Vec<f32>, PatientError> {
        let mut vectors = self.embedder.embed(&[text]).await?;
        vectors
            .pop()
            .ok_or_else(|| PatientError::Storage("embedder returned no vector".to_string()))
    }
}

fn validate_fields(
    name: &str,
    gender: &str,
    height_cm: f64,
    weight_kg: f64,
    bmi: f64,
) -> Result<(), PatientError> {
    if name.trim().is_empty() {
        return Err(PatientError::Invalid("name cannot be empty".to_string()));
    }
    if gender.trim().is_empty() {
        return Err(PatientError::Invalid("gender cannot be empty".to_string()));
    }
    for (field, value) in [
        ("height_cm", height_cm),
        ("weight_kg", weight_kg),
        ("bmi", bmi),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(PatientError::Invalid(format!(
                "{field} must be a positive number"
            )));
        }
    }
    Ok(())
}
