//! Embedder trait for text-to-vector conversion.
//!
//! The model behind this trait is loaded once per process and is read-only
//! afterwards; implementations must be safe to share across requests.

use std::sync::Arc;

use carebase_types::error::RepositoryError;

/// Trait for converting text into fixed-length embedding vectors.
///
/// Batch-first: one call embeds many texts so callers amortize model
/// dispatch during bulk loads. The empty string is valid input and yields a
/// deterministic vector, not an error.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts. Returns one vector per input text.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, RepositoryError>> + Send;

    /// The model name used for embeddings (e.g., "all-MiniLM-L6-v2").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}

/// The one-time-loaded model is shared across services via `Arc`.
impl<T: Embedder> Embedder for Arc<T> {
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, RepositoryError>> + Send {
        self.as_ref().embed(texts)
    }

    fn model_name(&self) -> &str {
        self.as_ref().model_name()
    }

    fn dimension(&self) -> usize {
        self.as_ref().dimension()
    }
}
