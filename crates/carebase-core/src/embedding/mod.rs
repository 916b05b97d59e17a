//! Embedding ports: the text-to-vector function and the vector index.

pub mod embedder;
pub mod index;

pub use embedder::Embedder;
pub use index::{EmbeddingIndex, Neighbor};
