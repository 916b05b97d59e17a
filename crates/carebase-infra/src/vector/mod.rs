//! LanceDB embedding index and fastembed text embedder.

pub mod embedder;
pub mod index;
pub mod lance;
pub mod schema;

pub use embedder::FastEmbedder;
pub use index::LanceEmbeddingIndex;
pub use lance::LanceVectorStore;
