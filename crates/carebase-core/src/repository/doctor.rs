//! Doctor repository trait definition.

use carebase_types::doctor::Doctor;
use carebase_types::error::RepositoryError;

/// Repository trait for doctor persistence.
pub trait DoctorRepository: Send + Sync {
    /// Insert-or-overwrite by primary key.
    fn upsert(
        &self,
        doctor: &Doctor,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch a doctor by id.
    fn get(
        &self,
        doctor_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Doctor>, RepositoryError>> + Send;
}
