//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use carebase_types::error::{AppointmentError, PatientError, SearchError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Patient(PatientError),
    Appointment(AppointmentError),
    Search(SearchError),
}

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        AppError::Patient(e)
    }
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        AppError::Appointment(e)
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        AppError::Search(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Patient(PatientError::NotFound) => (
                StatusCode::NOT_FOUND,
                "PATIENT_NOT_FOUND",
                "Patient not found".to_string(),
            ),
            AppError::Patient(PatientError::Invalid(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Patient(PatientError::Storage(msg)) => {
                tracing::error!(detail = %msg, "patient storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Appointment(AppointmentError::NoAppointments) => (
                StatusCode::NOT_FOUND,
                "NO_APPOINTMENTS",
                "No appointments found for this patient".to_string(),
            ),
            AppError::Appointment(AppointmentError::Storage(msg)) => {
                tracing::error!(detail = %msg, "appointment storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Search(SearchError::InvalidTopK) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                SearchError::InvalidTopK.to_string(),
            ),
            // The cause goes to the logs; the client gets an opaque 500.
            AppError::Search(e) => {
                tracing::error!(detail = %e, "semantic search failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SEARCH_FAILED",
                    "Semantic search failed".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
