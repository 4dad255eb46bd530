//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHUNK_CHARS, DEFAULT_OVERLAP_CHARS,
    DEFAULT_TOP_K,
};

/// Global service configuration, loaded from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Default maximum characters per chunk
    pub max_chars: usize,

    /// Default sentence-overlap budget between consecutive chunks
    pub overlap_chars: usize,

    /// Default number of chunks retrieved per query
    pub top_k: usize,

    /// Directory where the vector index is persisted
    pub index_dir: PathBuf,

    /// URL of the embedding service (local hashing embedder when unset)
    pub embedding_service_url: Option<String>,

    /// Embedding dimensionality (must match the embedding backend)
    pub embedding_dimensions: usize,

    /// URL of the text-generation service
    pub generation_service_url: Option<String>,

    /// Model name passed to the generation service
    pub generation_model: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap_chars: DEFAULT_OVERLAP_CHARS,
            top_k: DEFAULT_TOP_K,
            index_dir: PathBuf::from("index"),
            embedding_service_url: None,
            embedding_dimensions: DEFAULT_EMBEDDING_DIM,
            generation_service_url: None,
            generation_model: "llama3".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_chars: std::env::var("MAX_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CHARS),
            overlap_chars: std::env::var("OVERLAP_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_OVERLAP_CHARS),
            top_k: std::env::var("TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TOP_K),
            index_dir: std::env::var("INDEX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("index")),
            embedding_service_url: std::env::var("EMBEDDING_SERVICE_URL").ok(),
            embedding_dimensions: std::env::var("EMBEDDING_DIMENSIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EMBEDDING_DIM),
            generation_service_url: std::env::var("GENERATION_SERVICE_URL").ok(),
            generation_model: std::env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "llama3".to_string()),
        }
    }

    /// Derive the per-call chunking configuration.
    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            max_chars: self.max_chars,
            overlap_chars: self.overlap_chars,
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
        }
    }
}

/// Configuration for individual chunking operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk (oversized atomic math excepted)
    pub max_chars: usize,

    /// Budget for sentence-level overlap carried across a chunk seam
    pub overlap_chars: usize,

    /// Chunks at or below this trimmed length are discarded as noise
    pub min_chunk_chars: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap_chars: DEFAULT_OVERLAP_CHARS,
            min_chunk_chars: DEFAULT_MIN_CHUNK_CHARS,
        }
    }
}

impl ChunkConfig {
    /// Create a config with the given size budget.
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars,
            ..Default::default()
        }
    }

    /// Set the overlap budget.
    pub fn with_overlap(mut self, overlap_chars: usize) -> Self {
        self.overlap_chars = overlap_chars;
        self
    }
}
