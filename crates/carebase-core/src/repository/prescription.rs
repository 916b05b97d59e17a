//! Prescription repository trait definition.

use carebase_types::error::RepositoryError;
use carebase_types::visit::Prescription;
use chrono::NaiveDate;

/// Repository trait for prescription persistence.
pub trait PrescriptionRepository: Send + Sync {
    /// Insert-or-overwrite by the (patient, doctor, date) composite key.
    fn upsert(
        &self,
        prescription: &Prescription,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Exact composite-key lookup. This is the join point for the
    /// appointment-info view; no fuzzier matching is performed.
    fn find(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
    ) -> impl std::future::Future<Output = Result<Option<Prescription>, RepositoryError>> + Send;
}
