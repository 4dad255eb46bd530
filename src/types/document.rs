//! Document and chunk types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A source document: an opaque identifier plus its raw extracted text.
///
/// Text extraction (OCR fallback, header/footer stripping) happens upstream;
/// the service receives documents as plain text and treats them as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier for this document
    pub id: Uuid,

    /// Display name, typically the source filename
    pub name: String,

    /// The full raw extracted text
    pub content: String,

    /// When this document was submitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a document from a name and its raw text.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: content.into(),
            created_at: Some(Utc::now()),
        }
    }

    /// Content length in characters.
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A chunk of content produced by the assembler.
///
/// Chunks are the fundamental unit of content that gets embedded and
/// indexed. Each chunk keeps a reference back to its document and its
/// position in the document's chunk sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: Uuid,

    /// ID of the document this chunk was assembled from
    pub document_id: Uuid,

    /// The chunk text
    pub content: String,

    /// Length of the content in characters
    pub char_count: usize,

    /// Order of this chunk within its document (0-indexed)
    pub chunk_index: usize,

    /// When this chunk was created
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(document_id: Uuid, content: String, chunk_index: usize) -> Self {
        let char_count = content.chars().count();
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            char_count,
            chunk_index,
            created_at: Utc::now(),
        }
    }
}
