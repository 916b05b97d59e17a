//! Appointment repository trait definition.

use carebase_types::error::RepositoryError;
use carebase_types::visit::Appointment;

/// Repository trait for appointment persistence.
pub trait AppointmentRepository: Send + Sync {
    /// Insert-or-overwrite by the (patient, doctor, date) composite key.
    fn upsert(
        &self,
        appointment: &Appointment,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All appointments for one patient, in (date, doctor) order.
    fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Appointment>, RepositoryError>> + Send;
}
