//! Study Guide Service Library
//!
//! A retrieval-augmented study-guide generator for lecture notes and
//! textbook material. Documents are chunked with heading and math
//! awareness, embedded into a flat vector index, and retrieved as context
//! for LLM-generated study guides.

pub mod api;
pub mod chunking;
pub mod generate;
pub mod index;
pub mod pipeline;
pub mod types;

pub use chunking::{normalize_paragraphs, split_into_chunks, ChunkAssembler};
pub use generate::{generate_study_guide, GuideOutcome, TextGenerator};
pub use index::{Embedder, HashEmbedder, RemoteEmbedder, VectorIndex};
pub use types::{Chunk, ChunkConfig, Document, ServiceConfig, StudyGuide};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunking::*;
    pub use crate::generate::*;
    pub use crate::index::*;
    pub use crate::pipeline::*;
    pub use crate::types::*;
}

/// Default maximum chunk size in characters
pub const DEFAULT_MAX_CHARS: usize = 1500;

/// Default overlap carried between consecutive chunks, in characters
pub const DEFAULT_OVERLAP_CHARS: usize = 200;

/// Chunks at or below this trimmed length are discarded
pub const DEFAULT_MIN_CHUNK_CHARS: usize = 30;

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 5;

/// Default embedding dimensionality
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
