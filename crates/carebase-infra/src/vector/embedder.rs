//! fastembed-backed text embedder.
//!
//! Wraps fastembed's `TextEmbedding` with the all-MiniLM-L6-v2 model,
//! producing 384-dimensional vectors. Model initialization downloads and
//! loads ONNX weights, so it happens once at startup; inference is CPU-bound
//! and runs on the blocking thread pool.

use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use carebase_core::embedding::embedder::Embedder;
use carebase_types::error::RepositoryError;

use super::schema::EMBEDDING_DIMENSION;

const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// fastembed implementation of `Embedder` using all-MiniLM-L6-v2.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Load the embedding model. Slow on first run (downloads weights);
    /// call once at startup and share the result.
    pub fn new() -> Result<Self, RepositoryError> {
        let started = std::time::Instant::now();
        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| RepositoryError::Connection(format!("Failed to load {MODEL_NAME}: {e}")))?;
        tracing::info!(
            model = MODEL_NAME,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedding model loaded"
        );
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RepositoryError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        // ONNX inference is CPU-bound; keep it off the async executor.
        // fastembed's `embed` takes `&mut self`, so inference is serialized
        // behind a mutex.
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut model = model.lock().expect("embedding model mutex poisoned");
            model.embed(texts, None)
        })
            .await
            .map_err(|e| RepositoryError::Query(format!("Embedding task panicked: {e}")))?
            .map_err(|e| RepositoryError::Query(format!("Embedding failed: {e}")))?;

        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION as usize
    }
}
