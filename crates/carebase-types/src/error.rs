use thiserror::Error;

/// Errors from repository and vector-index operations (used by the trait
/// definitions in carebase-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to patient operations.
#[derive(Debug, Error)]
pub enum PatientError {
    #[error("patient not found")]
    NotFound,

    #[error("invalid patient data: {0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for PatientError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => PatientError::NotFound,
            RepositoryError::Conflict(msg) => PatientError::Invalid(msg),
            other => PatientError::Storage(other.to_string()),
        }
    }
}

/// Errors from the composite appointment-info view.
#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("no appointments found for this patient")]
    NoAppointments,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for AppointmentError {
    fn from(e: RepositoryError) -> Self {
        AppointmentError::Storage(e.to_string())
    }
}

/// Errors from the semantic search path.
///
/// Everything except `InvalidTopK` is surfaced to clients as an opaque
/// internal error; the detail is for server-side logs only.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("top_k must be a positive integer")]
    InvalidTopK,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("vector query failed: {0}")]
    Query(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from the startup data load. All variants are fatal to startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open spreadsheet '{path}': {detail}")]
    Open { path: String, detail: String },

    #[error("source '{source_name}' is missing expected column '{column}'")]
    MissingColumn {
        source_name: String,
        column: String,
    },

    #[error("source '{source_name}' row {row}: invalid value in column '{column}'")]
    InvalidCell {
        source_name: String,
        column: String,
        row: usize,
    },

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("storage error during load: {0}")]
    Storage(#[from] RepositoryError),
}
