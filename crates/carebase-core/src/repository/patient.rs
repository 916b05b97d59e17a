//! Patient repository trait definition.

use carebase_types::error::RepositoryError;
use carebase_types::patient::{CreatePatientRequest, Patient};

/// Repository trait for patient persistence.
///
/// Implementations live in carebase-infra (e.g., SqlitePatientRepository).
/// Uses native async fn in traits (no async_trait macro).
pub trait PatientRepository: Send + Sync {
    /// Insert a new patient. When `request.id` is absent the store assigns
    /// one. A supplied id that already exists is a conflict.
    fn create(
        &self,
        request: &CreatePatientRequest,
    ) -> impl std::future::Future<Output = Result<Patient, RepositoryError>> + Send;

    /// Insert-or-overwrite by primary key (loader merge semantics).
    fn upsert(
        &self,
        patient: &Patient,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch a patient by id.
    fn get(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Patient>, RepositoryError>> + Send;

    /// List a page of patients in stable id order.
    fn list(
        &self,
        offset: i64,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Patient>, RepositoryError>> + Send;

    /// Overwrite an existing patient row. `NotFound` when the id is absent.
    fn update(
        &self,
        patient: &Patient,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
