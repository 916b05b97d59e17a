//! Semantic search handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use carebase_core::service::search::DEFAULT_TOP_K;
use carebase_types::error::SearchError;
use carebase_types::patient::PatientMatch;

use crate::http::error::AppError;
use crate::state::AppState;

/// Query parameters for POST /search.
///
/// `top_k` is signed so that a negative value reaches the validation path
/// instead of failing query deserialization.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub top_k: Option<i64>,
}

fn resolve_top_k(raw: Option<i64>) -> Result<usize, SearchError> {
    match raw {
        None => Ok(DEFAULT_TOP_K),
        Some(k) if k > 0 => Ok(k as usize),
        Some(_) => Err(SearchError::InvalidTopK),
    }
}

/// POST /search?query=&top_k= - Patients ranked by similarity of their
/// medical history to the query text.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<PatientMatch>>, AppError> {
    let top_k = resolve_top_k(params.top_k)?;
    let matches = state.search_service.search(&params.query, top_k).await?;
    Ok(Json(matches))
}
