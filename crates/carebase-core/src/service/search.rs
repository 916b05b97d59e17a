//! Semantic search over patient medical history.

use carebase_types::error::SearchError;
use carebase_types::patient::PatientMatch;

use crate::embedding::{Embedder, EmbeddingIndex};
use crate::repository::patient::PatientRepository;

/// Default number of results when the caller does not specify top_k.
pub const DEFAULT_TOP_K: usize = 5;

/// Service ranking patients by vector distance to a query string.
pub struct SearchService<R: PatientRepository, E: Embedder, I: EmbeddingIndex> {
    patients: R,
    embedder: E,
    index: I,
}

impl<R: PatientRepository, E: Embedder, I: EmbeddingIndex> SearchService<R, E, I> {
    pub fn new(patients: R, embedder: E, index: I) -> Self {
        Self {
            patients,
            embedder,
            index,
        }
    }

    /// Embed `query`, fetch the `top_k` nearest history embeddings from the
    /// index, and hydrate the matching patient rows. Results are ordered by
    /// ascending distance, i.e. non-increasing similarity.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<PatientMatch>, SearchError> {
        if top_k == 0 {
            return Err(SearchError::InvalidTopK);
        }

        let mut vectors = self
            .embedder
            .embed(&[query.to_string()])
            .await
            .map_err(|e| SearchError::Embedding(e.to_string()))?;
        let query_vector = vectors
            .pop()
            .ok_or_else(|| SearchError::Embedding("embedder returned no vector".to_string()))?;

        let neighbors = self
            .index
            .nearest_history(&query_vector, top_k)
            .await
            .map_err(|e| SearchError::Query(e.to_string()))?;

        let mut matches = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let patient = self
                .patients
                .get(neighbor.patient_id)
                .await
                .map_err(|e| SearchError::Storage(e.to_string()))?;
            // An index entry without a row means the stores diverged; skip
            // the hit rather than failing the whole search.
            let Some(patient) = patient else {
                tracing::warn!(
                    patient_id = neighbor.patient_id,
                    "history index entry has no patient row"
                );
                continue;
            };
            matches.push(PatientMatch::from_distance(patient, neighbor.distance));
        }

        Ok(matches)
    }
}
