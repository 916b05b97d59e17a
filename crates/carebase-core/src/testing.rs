//! In-memory fakes for service and loader tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use carebase_types::doctor::Doctor;
use carebase_types::error::{LoadError, RepositoryError};
use carebase_types::patient::{CreatePatientRequest, Patient};
use carebase_types::visit::{Appointment, Prescription};
use chrono::NaiveDate;

use crate::embedding::{Embedder, EmbeddingIndex, Neighbor};
use crate::load::RecordSource;
use crate::repository::appointment::AppointmentRepository;
use crate::repository::doctor::DoctorRepository;
use crate::repository::patient::PatientRepository;
use crate::repository::prescription::PrescriptionRepository;

#[derive(Clone, Default)]
pub(crate) struct FakePatientRepository {
    rows: Arc<Mutex<HashMap<i64, Patient>>>,
    fail_next_upsert: Arc<Mutex<bool>>,
}

impl FakePatientRepository {
    pub(crate) async fn seed(&self, patient: Patient) {
        self.rows.lock().unwrap().insert(patient.id, patient);
    }

    pub(crate) async fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub(crate) async fn fail_next_upsert(&self) {
        *self.fail_next_upsert.lock().unwrap() = true;
    }
}

impl PatientRepository for FakePatientRepository {
    async fn create(&self, request: &CreatePatientRequest) -> Result<Patient, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let id = match request.id {
            Some(id) => {
                if rows.contains_key(&id) {
                    return Err(RepositoryError::Conflict(format!(
                        "patient id {id} already exists"
                    )));
                }
                id
            }
            None => rows.keys().max().copied().unwrap_or(0) + 1,
        };
        let patient = Patient {
            id,
            name: request.name.clone(),
            gender: request.gender.clone(),
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            bmi: request.bmi,
            medical_history: request.medical_history.clone(),
        };
        rows.insert(id, patient.clone());
        Ok(patient)
    }

    async fn upsert(&self, patient: &Patient) -> Result<(), RepositoryError> {
        if std::mem::take(&mut *self.fail_next_upsert.lock().unwrap()) {
            return Err(RepositoryError::Connection("injected failure".to_string()));
        }
        self.rows
            .lock()
            .unwrap()
            .insert(patient.id, patient.clone());
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Patient>, RepositoryError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Patient>, RepositoryError> {
        let mut rows: Vec<Patient> = self.rows.lock().unwrap().values().cloned().collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn update(&self, patient: &Patient) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&patient.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(patient.id, patient.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeDoctorRepository {
    rows: Arc<Mutex<HashMap<i64, Doctor>>>,
}

impl FakeDoctorRepository {
    pub(crate) async fn insert(&self, doctor: Doctor) {
        self.rows.lock().unwrap().insert(doctor.doctor_id, doctor);
    }

    pub(crate) async fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl DoctorRepository for FakeDoctorRepository {
    async fn upsert(&self, doctor: &Doctor) -> Result<(), RepositoryError> {
        self.insert(doctor.clone()).await;
        Ok(())
    }

    async fn get(&self, doctor_id: i64) -> Result<Option<Doctor>, RepositoryError> {
        Ok(self.rows.lock().unwrap().get(&doctor_id).cloned())
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeAppointmentRepository {
    rows: Arc<Mutex<HashMap<(i64, i64, NaiveDate), Appointment>>>,
}

impl FakeAppointmentRepository {
    pub(crate) async fn insert(&self, appointment: Appointment) {
        let key = (
            appointment.patient_id,
            appointment.doctor_id,
            appointment.appointment_date,
        );
        self.rows.lock().unwrap().insert(key, appointment);
    }

    pub(crate) async fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl AppointmentRepository for FakeAppointmentRepository {
    async fn upsert(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        self.insert(appointment.clone()).await;
        Ok(())
    }

    async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut rows: Vec<Appointment> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.appointment_date, a.doctor_id));
        Ok(rows)
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakePrescriptionRepository {
    rows: Arc<Mutex<HashMap<(i64, i64, NaiveDate), Prescription>>>,
}

impl FakePrescriptionRepository {
    pub(crate) async fn insert(&self, prescription: Prescription) {
        let key = (
            prescription.patient_id,
            prescription.doctor_id,
            prescription.date,
        );
        self.rows.lock().unwrap().insert(key, prescription);
    }

    pub(crate) async fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl PrescriptionRepository for FakePrescriptionRepository {
    async fn upsert(&self, prescription: &Prescription) -> Result<(), RepositoryError> {
        self.insert(prescription.clone()).await;
        Ok(())
    }

    async fn find(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Option<Prescription>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(patient_id, doctor_id, date))
            .cloned())
    }
}

const FAKE_DIMENSION: usize = 8;

/// Deterministic character-bag embedder. Identical texts embed identically;
/// the empty string maps to a fixed unit vector.
#[derive(Clone, Default)]
pub(crate) struct FakeEmbedder {
    batches: Arc<Mutex<Vec<usize>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl FakeEmbedder {
    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().clone()
    }

    pub(crate) fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    fn embed_one(text: &str) -> Vec<f32> {
        let mut v = vec![0.0_f32; FAKE_DIMENSION];
        if text.is_empty() {
            v[0] = 1.0;
            return v;
        }
        for (i, byte) in text.bytes().enumerate() {
            v[i % FAKE_DIMENSION] += f32::from(byte) / 255.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        v.iter().map(|x| x / norm).collect()
    }
}

impl Embedder for FakeEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RepositoryError> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(RepositoryError::Query("injected embedder failure".to_string()));
        }
        self.batches.lock().unwrap().push(texts.len());
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }

    fn model_name(&self) -> &str {
        "fake-char-bag"
    }

    fn dimension(&self) -> usize {
        FAKE_DIMENSION
    }
}

/// In-memory vector index computing exact cosine distance.
#[derive(Clone, Default)]
pub(crate) struct FakeIndex {
    history: Arc<Mutex<HashMap<i64, Vec<f32>>>>,
    specialty: Arc<Mutex<HashMap<i64, Vec<f32>>>>,
    diagnosis: Arc<Mutex<HashMap<(i64, i64, NaiveDate), Vec<f32>>>>,
}

impl FakeIndex {
    pub(crate) fn history_entry(&self, patient_id: i64) -> Option<Vec<f32>> {
        self.history.lock().unwrap().get(&patient_id).cloned()
    }

    pub(crate) fn history_len(&self) -> usize {
        self.history.lock().unwrap().len()
    }

    pub(crate) fn specialty_len(&self) -> usize {
        self.specialty.lock().unwrap().len()
    }

    pub(crate) fn diagnosis_len(&self) -> usize {
        self.diagnosis.lock().unwrap().len()
    }

    fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 1.0;
        }
        1.0 - dot / (norm_a * norm_b)
    }
}

impl EmbeddingIndex for FakeIndex {
    async fn upsert_history(
        &self,
        patient_id: i64,
        embedding: &[f32],
    ) -> Result<(), RepositoryError> {
        self.history
            .lock()
            .unwrap()
            .insert(patient_id, embedding.to_vec());
        Ok(())
    }

    async fn upsert_specialty(
        &self,
        doctor_id: i64,
        embedding: &[f32],
    ) -> Result<(), RepositoryError> {
        self.specialty
            .lock()
            .unwrap()
            .insert(doctor_id, embedding.to_vec());
        Ok(())
    }

    async fn upsert_diagnosis(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
        embedding: &[f32],
    ) -> Result<(), RepositoryError> {
        self.diagnosis
            .lock()
            .unwrap()
            .insert((patient_id, doctor_id, date), embedding.to_vec());
        Ok(())
    }

    async fn nearest_history(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<Neighbor>, RepositoryError> {
        let mut neighbors: Vec<Neighbor> = self
            .history
            .lock()
            .unwrap()
            .iter()
            .map(|(id, v)| Neighbor {
                patient_id: *id,
                distance: Self::cosine_distance(query, v),
            })
            .collect();
        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(limit);
        Ok(neighbors)
    }
}

/// Small fixed dataset standing in for the spreadsheet sources.
#[derive(Clone)]
pub(crate) struct FakeRecordSource {
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    prescriptions: Vec<Prescription>,
}

impl FakeRecordSource {
    pub(crate) fn sample() -> Self {
        let date = NaiveDate::parse_from_str("2024-03-05", "%Y-%m-%d").unwrap();
        Self {
            patients: vec![
                Patient {
                    id: 1,
                    name: "Ada Gray".to_string(),
                    gender: "F".to_string(),
                    height_cm: 170.0,
                    weight_kg: 62.0,
                    bmi: 21.5,
                    medical_history: Some("type 2 diabetes".to_string()),
                },
                Patient {
                    id: 2,
                    name: "Ben Cole".to_string(),
                    gender: "M".to_string(),
                    height_cm: 181.0,
                    weight_kg: 79.0,
                    bmi: 24.1,
                    medical_history: None,
                },
            ],
            doctors: vec![
                Doctor {
                    doctor_id: 10,
                    doctor_name: "Dr. Okafor".to_string(),
                    specialty: "Cardiology".to_string(),
                },
                Doctor {
                    doctor_id: 11,
                    doctor_name: "Dr. Shaw".to_string(),
                    specialty: "Endocrinology".to_string(),
                },
            ],
            appointments: vec![
                Appointment {
                    patient_id: 1,
                    doctor_id: 11,
                    appointment_date: date,
                },
                Appointment {
                    patient_id: 2,
                    doctor_id: 10,
                    appointment_date: date,
                },
            ],
            prescriptions: vec![Prescription {
                patient_id: 1,
                doctor_id: 11,
                date,
                diagnosis: Some("Type 2 diabetes".to_string()),
                medicine_prescribed: Some("Metformin".to_string()),
            }],
        }
    }
}

impl RecordSource for FakeRecordSource {
    fn patients(&self) -> Result<Vec<Patient>, LoadError> {
        Ok(self.patients.clone())
    }

    fn doctors(&self) -> Result<Vec<Doctor>, LoadError> {
        Ok(self.doctors.clone())
    }

    fn appointments(&self) -> Result<Vec<Appointment>, LoadError> {
        Ok(self.appointments.clone())
    }

    fn prescriptions(&self) -> Result<Vec<Prescription>, LoadError> {
        Ok(self.prescriptions.clone())
    }
}
