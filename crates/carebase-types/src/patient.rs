use serde::{Deserialize, Serialize};

/// A patient record.
///
/// The medical-history embedding is not part of this struct; it lives in the
/// vector index keyed by `id` and is maintained alongside every write that
/// touches `medical_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub medical_history: Option<String>,
}

/// Request body for POST /patient.
///
/// `id` may be supplied to load a record under a known key; when omitted the
/// store assigns one.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub id: Option<i64>,
    pub name: String,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub medical_history: Option<String>,
}

/// Request body for PUT /patient/{id}. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub medical_history: Option<String>,
}

impl UpdatePatientRequest {
    /// True when the request carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.height_cm.is_none()
            && self.weight_kg.is_none()
            && self.bmi.is_none()
            && self.medical_history.is_none()
    }

    /// Apply the supplied fields onto an existing record.
    pub fn apply(&self, patient: &mut Patient) {
        if let Some(name) = &self.name {
            patient.name = name.clone();
        }
        if let Some(gender) = &self.gender {
            patient.gender = gender.clone();
        }
        if let Some(height_cm) = self.height_cm {
            patient.height_cm = height_cm;
        }
        if let Some(weight_kg) = self.weight_kg {
            patient.weight_kg = weight_kg;
        }
        if let Some(bmi) = self.bmi {
            patient.bmi = bmi;
        }
        if let Some(history) = &self.medical_history {
            patient.medical_history = Some(history.clone());
        }
    }
}

/// One semantic search result: the patient record plus its similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct PatientMatch {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub medical_history: Option<String>,
    /// `1 - distance`, rounded to 4 decimal places. With cosine distance
    /// this is the cosine similarity of query and medical history.
    pub similarity_score: f64,
}

impl PatientMatch {
    /// Build a match from a patient row and its vector distance.
    pub fn from_distance(patient: Patient, distance: f32) -> Self {
        let similarity = 1.0 - f64::from(distance);
        Self {
            id: patient.id,
            name: patient.name,
            gender: patient.gender,
            height_cm: patient.height_cm,
            weight_kg: patient.weight_kg,
            bmi: patient.bmi,
            medical_history: patient.medical_history,
            similarity_score: (similarity * 10_000.0).round() / 10_000.0,
        }
    }
}
