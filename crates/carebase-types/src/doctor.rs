use serde::{Deserialize, Serialize};

/// A doctor record. The specialty embedding lives in the vector index
/// keyed by `doctor_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub specialty: String,
}
