use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An appointment, keyed by the (patient, doctor, date) triple. Carries no
/// attributes of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
}

/// A prescription, keyed by the same triple shape as [`Appointment`].
///
/// A prescription logically correlates to the appointment sharing its key,
/// but nothing enforces that link; the appointment-info view joins on exact
/// key equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub diagnosis: Option<String>,
    pub medicine_prescribed: Option<String>,
}

/// One row of the joined appointment/doctor/prescription view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentDetail {
    pub doctor_name: String,
    pub appointment_date: NaiveDate,
    pub diagnosis: String,
    pub medicine_prescribed: String,
}

/// Response body for GET /appointment_info/{patient_id}.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentInfo {
    pub patient_id: i64,
    pub appointments: Vec<AppointmentDetail>,
}
