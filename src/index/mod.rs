//! Retrieval index: embedding backends and the flat vector store.

mod embedder;
mod store;

pub use embedder::{Embedder, HashEmbedder, RemoteEmbedder};
pub use store::VectorIndex;
