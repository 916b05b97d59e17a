//! Arrow schema definitions for the LanceDB embedding tables.
//!
//! One table per embedded column: patient medical history, doctor
//! specialty, prescription diagnosis. Each carries the owning row's
//! primary key plus a 384-dimensional float32 vector.
//!
//! Arrow versions MUST match lancedb's transitive dependency (57.3 for
//! lancedb 0.26).

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// all-MiniLM-L6-v2 embedding dimension.
pub const EMBEDDING_DIMENSION: i32 = 384;

fn vector_field() -> Field {
    Field::new(
        "vector",
        DataType::FixedSizeList(
            Arc::new(Field::new("item", DataType::Float32, true)),
            EMBEDDING_DIMENSION,
        ),
        false,
    )
}

/// Schema for the `patient_history` table, keyed by patient id.
pub fn patient_history_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        vector_field(),
    ])
}

/// Schema for the `doctor_specialty` table, keyed by doctor id.
pub fn doctor_specialty_schema() -> Schema {
    Schema::new(vec![
        Field::new("doctor_id", DataType::Int64, false),
        vector_field(),
    ])
}

/// Schema for the `prescription_diagnosis` table.
///
/// `key` is the composite primary key rendered as
/// `{patient_id}:{doctor_id}:{date}`, used for delete-then-add upserts;
/// the component columns are kept alongside for filtering.
pub fn prescription_diagnosis_schema() -> Schema {
    Schema::new(vec![
        Field::new("key", DataType::Utf8, false),
        Field::new("patient_id", DataType::Int64, false),
        Field::new("doctor_id", DataType::Int64, false),
        Field::new("date", DataType::Utf8, false),
        vector_field(),
    ])
}
