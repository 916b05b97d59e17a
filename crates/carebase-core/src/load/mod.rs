//! Startup data loader.
//!
//! Reads the four tabular sources, embeds the free-text columns in one
//! batch per source, and upserts everything by primary key. Runs once,
//! synchronously, before the API accepts traffic; any failure here is
//! fatal to startup.

use carebase_types::doctor::Doctor;
use carebase_types::error::LoadError;
use carebase_types::patient::Patient;
use carebase_types::visit::{Appointment, Prescription};

use crate::embedding::{Embedder, EmbeddingIndex};
use crate::repository::appointment::AppointmentRepository;
use crate::repository::doctor::DoctorRepository;
use crate::repository::patient::PatientRepository;
use crate::repository::prescription::PrescriptionRepository;

/// Typed access to the four tabular sources.
///
/// Implementations extract fields by exact column name and fail the whole
/// load on a missing column or an uninterpretable cell.
pub trait RecordSource: Send + Sync {
    fn patients(&self) -> Result<Vec<Patient>, LoadError>;
    fn doctors(&self) -> Result<Vec<Doctor>, LoadError>;
    fn appointments(&self) -> Result<Vec<Appointment>, LoadError>;
    fn prescriptions(&self) -> Result<Vec<Prescription>, LoadError>;
}

/// Row counts from one full load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub patients: usize,
    pub doctors: usize,
    pub appointments: usize,
    pub prescriptions: usize,
}

/// Loads the four sources into the store and the embedding index.
///
/// Parent tables load before child tables: patients and doctors run
/// concurrently, then appointments and prescriptions. A child row whose
/// parent never loaded surfaces as a foreign-key failure from the store,
/// never a silent skip.
pub struct DataLoader<S, E, I, PR, DR, AR, XR>
where
    S: RecordSource,
    E: Embedder,
    I: EmbeddingIndex,
    PR: PatientRepository,
    DR: DoctorRepository,
    AR: AppointmentRepository,
    XR: PrescriptionRepository,
{
    source: S,
    embedder: E,
    index: I,
    patients: PR,
    doctors: DR,
    appointments: AR,
    prescriptions: XR,
}

impl<S, E, I, PR, DR, AR, XR> DataLoader<S, E, I, PR, DR, AR, XR>
where
    S: RecordSource,
    E: Embedder,
    I: EmbeddingIndex,
    PR: PatientRepository,
    DR: DoctorRepository,
    AR: AppointmentRepository,
    XR: PrescriptionRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: S,
        embedder: E,
        index: I,
        patients: PR,
        doctors: DR,
        appointments: AR,
        prescriptions: XR,
    ) -> Self {
        Self {
            source,
            embedder,
            index,
            patients,
            doctors,
            appointments,
            prescriptions,
        }
    }

    /// Run the full load. Idempotent: reloading the same sources replaces
    /// matching rows instead of duplicating them.
    pub async fn load_all(&self) -> Result<LoadSummary, LoadError> {
        let (patients, doctors) = tokio::try_join!(self.load_patients(), self.load_doctors())?;
        let (appointments, prescriptions) =
            tokio::try_join!(self.load_appointments(), self.load_prescriptions())?;

        let summary = LoadSummary {
            patients,
            doctors,
            appointments,
            prescriptions,
        };
        tracing::info!(
            patients = summary.patients,
            doctors = summary.doctors,
            appointments = summary.appointments,
            prescriptions = summary.prescriptions,
            "startup data load complete"
        );
        Ok(summary)
    }

    async fn load_patients(&self) -> Result<usize, LoadError> {
        let rows = self.source.patients()?;
        let embeddings = self
            .embed_column(rows.iter().map(|p| p.medical_history.clone().unwrap_or_default()))
            .await?;

        for (patient, embedding) in rows.iter().zip(&embeddings) {
            self.patients.upsert(patient).await?;
            self.index.upsert_history(patient.id, embedding).await?;
        }
        Ok(rows.len())
    }

    async fn load_doctors(&self) -> Result<usize, LoadError> {
        let rows = self.source.doctors()?;
        let embeddings = self
            .embed_column(rows.iter().map(|d| d.specialty.clone()))
            .await?;

        for (doctor, embedding) in rows.iter().zip(&embeddings) {
            self.doctors.upsert(doctor).await?;
            self.index
                .upsert_specialty(doctor.doctor_id, embedding)
                .await?;
        }
        Ok(rows.len())
    }

    async fn load_appointments(&self) -> Result<usize, LoadError> {
        let rows = self.source.appointments()?;
        for appointment in &rows {
            self.appointments.upsert(appointment).await?;
        }
        Ok(rows.len())
    }

    async fn load_prescriptions(&self) -> Result<usize, LoadError> {
        let rows = self.source.prescriptions()?;
        let embeddings = self
            .embed_column(rows.iter().map(|p| p.diagnosis.clone().unwrap_or_default()))
            .await?;

        for (prescription, embedding) in rows.iter().zip(&embeddings) {
            self.prescriptions.upsert(prescription).await?;
            self.index
                .upsert_diagnosis(
                    prescription.patient_id,
                    prescription.doctor_id,
                    prescription.date,
                    embedding,
                )
                .await?;
        }
        Ok(rows.len())
    }

    /// Embed a whole column in one batch call so model dispatch is
    /// amortized across the load.
    async fn embed_column(
        &self,
        texts: impl Iterator<Item = String>,
    ) -> Result<Vec<Vec<f32>>, LoadError> {
        let texts: Vec<String> = texts.collect();
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embeddings = self
            .embedder
            .embed(&texts)
            .await
            .map_err(|e| LoadError::Embedding(e.to_string()))?;
        if embeddings.len() != texts.len() {
            return Err(LoadError::Embedding(format!(
                "expected {} vectors, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeAppointmentRepository, FakeDoctorRepository, FakeEmbedder, FakeIndex,
        FakePatientRepository, FakePrescriptionRepository, FakeRecordSource,
    };

    type TestLoader = DataLoader<
        FakeRecordSource,
        FakeEmbedder,
        FakeIndex,
        FakePatientRepository,
        FakeDoctorRepository,
        FakeAppointmentRepository,
        FakePrescriptionRepository,
    >;

    struct Harness {
        loader: TestLoader,
        patients: FakePatientRepository,
        doctors: FakeDoctorRepository,
        appointments: FakeAppointmentRepository,
        prescriptions: FakePrescriptionRepository,
        index: FakeIndex,
        embedder: FakeEmbedder,
    }

    fn harness() -> Harness {
        let patients = FakePatientRepository::default();
        let doctors = FakeDoctorRepository::default();
        let appointments = FakeAppointmentRepository::default();
        let prescriptions = FakePrescriptionRepository::default();
        let index = FakeIndex::default();
        let embedder = FakeEmbedder::default();

        let loader = DataLoader::new(
            FakeRecordSource::sample(),
            embedder.clone(),
            index.clone(),
            patients.clone(),
            doctors.clone(),
            appointments.clone(),
            prescriptions.clone(),
        );

        Harness {
            loader,
            patients,
            doctors,
            appointments,
            prescriptions,
            index,
            embedder,
        }
    }

    #[tokio::test]
    async fn test_load_all_counts_every_source() {
        let h = harness();
        let summary = h.loader.load_all().await.unwrap();

        assert_eq!(summary.patients, 2);
        assert_eq!(summary.doctors, 2);
        assert_eq!(summary.appointments, 2);
        assert_eq!(summary.prescriptions, 1);

        assert_eq!(h.patients.len().await, 2);
        assert_eq!(h.doctors.len().await, 2);
        assert_eq!(h.appointments.len().await, 2);
        assert_eq!(h.prescriptions.len().await, 1);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let h = harness();
        h.loader.load_all().await.unwrap();
        h.loader.load_all().await.unwrap();

        assert_eq!(h.patients.len().await, 2);
        assert_eq!(h.doctors.len().await, 2);
        assert_eq!(h.appointments.len().await, 2);
        assert_eq!(h.prescriptions.len().await, 1);
        assert_eq!(h.index.history_len(), 2);
        assert_eq!(h.index.specialty_len(), 2);
        assert_eq!(h.index.diagnosis_len(), 1);
    }

    #[tokio::test]
    async fn test_free_text_columns_are_embedded_per_source_batch() {
        let h = harness();
        h.loader.load_all().await.unwrap();

        // One batch each for patients, doctors, and prescriptions;
        // appointments carry no free text.
        let batches = h.embedder.batch_sizes();
        assert_eq!(batches.len(), 3);
        let mut sorted = batches.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 2]);
    }

    #[tokio::test]
    async fn test_storage_failure_aborts_the_load() {
        let h = harness();
        h.patients.fail_next_upsert().await;

        let err = h.loader.load_all().await.unwrap_err();
        assert!(matches!(err, LoadError::Storage(_)));
    }
}
