//! Ingest and batch-generation pipelines.
//!
//! Document ingestion runs chunking, embedding, and index insertion for a
//! set of documents, isolating per-document failures so one bad input does
//! not sink the batch. Batch generation does the same per topic.

use anyhow::Result;
use tracing::{info, warn};

use crate::generate::{generate_study_guide, GuideOutcome, TextGenerator};
use crate::index::{Embedder, VectorIndex};
use crate::chunking::split_into_chunks;
use crate::types::{Chunk, ChunkConfig, Document};

/// Error for one failed item within a batch.
#[derive(Debug, Clone)]
pub struct BatchError {
    pub item: String,
    pub error: String,
}

/// Result of ingesting a batch of documents.
#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub total_documents: usize,
    pub indexed_documents: usize,
    pub failed_documents: usize,
    pub total_chunks: usize,
    pub errors: Vec<BatchError>,
}

/// Chunk one document, tagging each chunk with its source name.
///
/// The `Source:` prefix travels into the index so retrieved context tells
/// the generator which notes it came from.
pub fn chunk_document(document: &Document, config: &ChunkConfig) -> Result<Vec<Chunk>> {
    let pieces = split_into_chunks(&document.content, config)?;
    Ok(pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            Chunk::new(
                document.id,
                format!("Source: {}\n\n{}", document.name, text),
                i,
            )
        })
        .collect())
}

/// Chunk, embed, and index a batch of documents.
pub async fn ingest_documents(
    documents: &[Document],
    config: &ChunkConfig,
    embedder: &dyn Embedder,
    index: &mut VectorIndex,
) -> Result<IngestSummary> {
    let total_documents = documents.len();
    let mut indexed_documents = 0;
    let mut total_chunks = 0;
    let mut errors = Vec::new();

    info!(total_documents, "Starting document ingest");

    for document in documents {
        let chunks = match chunk_document(document, config) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!(document = %document.name, error = %e, "Failed to chunk document");
                errors.push(BatchError {
                    item: document.name.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        if chunks.is_empty() {
            info!(document = %document.name, "Document produced no chunks, skipping");
            indexed_documents += 1;
            continue;
        }

        let texts: Vec<String> = chunks.into_iter().map(|c| c.content).collect();
        match embedder.embed(&texts).await {
            Ok(embeddings) => {
                let count = texts.len();
                index.add(texts, embeddings)?;
                total_chunks += count;
                indexed_documents += 1;
                info!(document = %document.name, chunks = count, "Indexed document");
            }
            Err(e) => {
                warn!(document = %document.name, error = %e, "Failed to embed document chunks");
                errors.push(BatchError {
                    item: document.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let summary = IngestSummary {
        total_documents,
        indexed_documents,
        failed_documents: errors.len(),
        total_chunks,
        errors,
    };

    info!(
        indexed = summary.indexed_documents,
        failed = summary.failed_documents,
        chunks = summary.total_chunks,
        "Document ingest complete"
    );

    Ok(summary)
}

/// Retrieve the top-k chunks for a query.
pub async fn retrieve(
    query: &str,
    k: usize,
    embedder: &dyn Embedder,
    index: &VectorIndex,
) -> Result<Vec<String>> {
    let embeddings = embedder.embed(&[query.to_string()]).await?;
    let query_vector = embeddings
        .first()
        .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for query"))?;
    Ok(index.search(query_vector, k))
}

/// One generated guide within a batch.
#[derive(Debug)]
pub struct GeneratedGuide {
    pub topic: String,
    pub outcome: GuideOutcome,
}

/// Result of batch guide generation.
#[derive(Debug)]
pub struct GenerateSummary {
    pub total_topics: usize,
    pub generated: usize,
    pub failed: usize,
    pub errors: Vec<BatchError>,
}

/// Generate study guides for a list of topics, continuing past failures.
pub async fn generate_guides(
    topics: &[String],
    top_k: usize,
    embedder: &dyn Embedder,
    index: &VectorIndex,
    generator: &dyn TextGenerator,
) -> (Vec<GeneratedGuide>, GenerateSummary) {
    let mut guides = Vec::new();
    let mut errors = Vec::new();

    for topic in topics {
        let result = async {
            let chunks = retrieve(topic, top_k, embedder, index).await?;
            generate_study_guide(topic, &chunks, generator).await
        }
        .await;

        match result {
            Ok(outcome) => guides.push(GeneratedGuide {
                topic: topic.clone(),
                outcome,
            }),
            Err(e) => {
                warn!(topic = %topic, error = %e, "Failed to generate guide");
                errors.push(BatchError {
                    item: topic.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let summary = GenerateSummary {
        total_topics: topics.len(),
        generated: guides.len(),
        failed: errors.len(),
        errors,
    };

    info!(
        generated = summary.generated,
        failed = summary.failed,
        "Batch guide generation complete"
    );

    (guides, summary)
}
