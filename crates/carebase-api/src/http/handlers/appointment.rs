//! Appointment-info handler.

use axum::extract::{Path, State};
use axum::Json;

use carebase_types::visit::AppointmentInfo;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /appointment_info/{patient_id} - Joined appointment/doctor/prescription
/// view for one patient. 404 when the patient has no appointments.
pub async fn appointment_info(
    State(state): State<AppState>,
    Path(patient_id): Path<i64>,
) -> Result<Json<AppointmentInfo>, AppError> {
    let info = state
        .appointment_service
        .appointment_info(patient_id)
        .await?;
    Ok(Json(info))
}
