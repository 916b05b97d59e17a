//! Composite appointment/doctor/prescription view.

use carebase_types::error::AppointmentError;
use carebase_types::visit::{AppointmentDetail, AppointmentInfo};

use crate::repository::appointment::AppointmentRepository;
use crate::repository::doctor::DoctorRepository;
use crate::repository::prescription::PrescriptionRepository;

/// Reported when an appointment's doctor row is missing. A dangling
/// doctor_id is not an error.
pub const UNKNOWN_DOCTOR: &str = "Unknown Doctor";

/// Reported for diagnosis and medicine when no prescription shares the
/// appointment's composite key.
pub const NOT_AVAILABLE: &str = "Not available";

/// Service assembling the appointment-info view for one patient.
pub struct AppointmentInfoService<A, D, P>
where
    A: AppointmentRepository,
    D: DoctorRepository,
    P: PrescriptionRepository,
{
    appointments: A,
    doctors: D,
    prescriptions: P,
}

impl<A, D, P> AppointmentInfoService<A, D, P>
where
    A: AppointmentRepository,
    D: DoctorRepository,
    P: PrescriptionRepository,
{
    pub fn new(appointments: A, doctors: D, prescriptions: P) -> Self {
        Self {
            appointments,
            doctors,
            prescriptions,
        }
    }

    /// Join each of the patient's appointments with its doctor's name and
    /// the prescription sharing the exact (patient, doctor, date) key.
    ///
    /// `NoAppointments` when the patient has none; missing doctors and
    /// prescriptions fall back to the literal placeholders instead.
    pub async fn appointment_info(
        &self,
        patient_id: i64,
    ) -> Result<AppointmentInfo, AppointmentError> {
        let appointments = self.appointments.list_for_patient(patient_id).await?;
        if appointments.is_empty() {
            return Err(AppointmentError::NoAppointments);
        }

        let mut details = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let doctor_name = match self.doctors.get(appointment.doctor_id).await? {
                Some(doctor) => doctor.doctor_name,
                None => UNKNOWN_DOCTOR.to_string(),
            };

            let prescription = self
                .prescriptions
                .find(
                    appointment.patient_id,
                    appointment.doctor_id,
                    appointment.appointment_date,
                )
                .await?;

            let (diagnosis, medicine_prescribed) = match prescription {
                Some(p) => (
                    p.diagnosis.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                    p.medicine_prescribed
                        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                ),
                None => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
            };

            details.push(AppointmentDetail {
                doctor_name,
                appointment_date: appointment.appointment_date,
                diagnosis,
                medicine_prescribed,
            });
        }

        Ok(AppointmentInfo {
            patient_id,
            appointments: details,
        })
    }
}
