//! Vector index trait definition.
//!
//! Distance computation and ranking are delegated entirely to the store
//! behind this trait; the services only hand over an embedding and a limit
//! and receive neighbors already ordered by ascending distance.

use carebase_types::error::RepositoryError;
use chrono::NaiveDate;

/// One nearest-neighbor hit from the patient-history index.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub patient_id: i64,
    /// Cosine distance; smaller is more similar.
    pub distance: f32,
}

/// Trait for the embedding index holding the free-text vector columns.
///
/// Upserts are keyed by the owning row's primary key so reloads replace
/// rather than duplicate.
pub trait EmbeddingIndex: Send + Sync {
    /// Insert-or-replace a patient's medical-history embedding.
    fn upsert_history(
        &self,
        patient_id: i64,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert-or-replace a doctor's specialty embedding.
    fn upsert_specialty(
        &self,
        doctor_id: i64,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert-or-replace a prescription's diagnosis embedding.
    fn upsert_diagnosis(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The `limit` nearest medical-history embeddings to `query`, ordered by
    /// ascending distance.
    fn nearest_history(
        &self,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Neighbor>, RepositoryError>> + Send;
}

impl<T: EmbeddingIndex> EmbeddingIndex for std::sync::Arc<T> {
    fn upsert_history(
        &self,
        patient_id: i64,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        self.as_ref().upsert_history(patient_id, embedding)
    }

    fn upsert_specialty(
        &self,
        doctor_id: i64,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        self.as_ref().upsert_specialty(doctor_id, embedding)
    }

    fn upsert_diagnosis(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send {
        self.as_ref()
            .upsert_diagnosis(patient_id, doctor_id, date, embedding)
    }

    fn nearest_history(
        &self,
        query: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Neighbor>, RepositoryError>> + Send {
        self.as_ref().nearest_history(query, limit)
    }
}
