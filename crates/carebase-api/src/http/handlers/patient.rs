//! Patient CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use carebase_core::service::patient::DEFAULT_PAGE_LIMIT;
use carebase_types::patient::{CreatePatientRequest, Patient, UpdatePatientRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// Paging parameters for GET /patients.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// GET /patients - List a page of patients ordered by id.
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    let patients = state.patient_service.list(query.skip, limit).await?;
    Ok(Json(patients))
}

/// GET /patient/{id} - Fetch one patient.
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, AppError> {
    let patient = state.patient_service.get(id).await?;
    Ok(Json(patient))
}

/// POST /patient - Create a patient and index its history embedding.
pub async fn create_patient(
    State(state): State<AppState>,
    Json(body): Json<CreatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let patient = state.patient_service.create(body).await?;
    Ok(Json(patient))
}

/// PUT /patient/{id} - Apply a partial update.
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let patient = state.patient_service.update(id, body).await?;
    Ok(Json(patient))
}
