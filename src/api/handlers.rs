//! HTTP request handlers for the study-guide service.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::chunking::split_into_chunks;
use crate::generate::TextGenerator;
use crate::index::{Embedder, VectorIndex};
use crate::pipeline;
use crate::types::{Document, ServiceConfig};

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServiceConfig,
    pub index: RwLock<VectorIndex>,
    pub embedder: Arc<dyn Embedder>,
    pub generator: Option<Arc<dyn TextGenerator>>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    indexed_chunks: usize,
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let indexed_chunks = state.index.read().await.len();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        indexed_chunks,
    })
}

/// One document in an ingest request.
#[derive(Debug, Deserialize)]
pub struct DocumentUpload {
    pub name: String,
    pub text: String,
}

/// Request to ingest raw-text documents into the index.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub documents: Vec<DocumentUpload>,
}

/// Response for an ingest request.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub indexed_documents: usize,
    pub failed_documents: usize,
    pub total_chunks: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Ingest documents: chunk, embed, index, persist.
pub async fn ingest_documents(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, StatusCode> {
    if request.documents.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    info!(documents = request.documents.len(), "Received ingest request");

    let documents: Vec<Document> = request
        .documents
        .into_iter()
        .map(|d| Document::new(d.name, d.text))
        .collect();

    let chunk_config = state.config.chunk_config();
    let mut index = state.index.write().await;

    let summary =
        pipeline::ingest_documents(&documents, &chunk_config, state.embedder.as_ref(), &mut index)
            .await
            .map_err(|e| {
                error!(error = %e, "Ingest failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    if let Err(e) = index.save(&state.config.index_dir) {
        error!(error = %e, "Failed to persist index");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(IngestResponse {
        indexed_documents: summary.indexed_documents,
        failed_documents: summary.failed_documents,
        total_chunks: summary.total_chunks,
        errors: summary
            .errors
            .into_iter()
            .map(|e| format!("{}: {}", e.item, e.error))
            .collect(),
    }))
}

/// Request to preview chunking without touching the index.
#[derive(Debug, Deserialize)]
pub struct ChunkRequest {
    pub text: String,
    pub max_chars: Option<usize>,
    pub overlap_chars: Option<usize>,
}

/// Response carrying the assembled chunks.
#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub count: usize,
    pub chunks: Vec<String>,
}

/// Chunk a text and return the pieces, for inspection and tuning.
pub async fn preview_chunks(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChunkRequest>,
) -> Result<Json<ChunkResponse>, StatusCode> {
    let mut config = state.config.chunk_config();
    if let Some(max_chars) = request.max_chars {
        config.max_chars = max_chars;
    }
    if let Some(overlap_chars) = request.overlap_chars {
        config.overlap_chars = overlap_chars;
    }

    let chunks = split_into_chunks(&request.text, &config).map_err(|e| {
        error!(error = %e, "Invalid chunking configuration");
        StatusCode::BAD_REQUEST
    })?;

    Ok(Json(ChunkResponse {
        count: chunks.len(),
        chunks,
    }))
}

/// Retrieval request.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub k: Option<usize>,
}

/// Retrieval response: ranked chunk texts, nearest first.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<String>,
}

/// Retrieve the top-k chunks for a query.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, StatusCode> {
    let k = request.k.unwrap_or(state.config.top_k);
    let index = state.index.read().await;

    let results = pipeline::retrieve(&request.query, k, state.embedder.as_ref(), &index)
        .await
        .map_err(|e| {
            error!(error = %e, "Retrieval failed");
            StatusCode::BAD_GATEWAY
        })?;

    Ok(Json(SearchResponse { results }))
}

/// Study-guide generation request.
#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    pub topic: String,
    pub top_k: Option<usize>,
}

/// A generated study guide.
#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub topic: String,
    pub guide: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

/// Generate a study guide for one topic.
pub async fn generate_guide(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GuideRequest>,
) -> Result<Json<GuideResponse>, StatusCode> {
    let generator = state
        .generator
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let top_k = request.top_k.unwrap_or(state.config.top_k);
    let index = state.index.read().await;

    let chunks = pipeline::retrieve(&request.topic, top_k, state.embedder.as_ref(), &index)
        .await
        .map_err(|e| {
            error!(error = %e, "Retrieval failed");
            StatusCode::BAD_GATEWAY
        })?;
    drop(index);

    let outcome =
        crate::generate::generate_study_guide(&request.topic, &chunks, generator.as_ref())
            .await
            .map_err(|e| {
                error!(topic = %request.topic, error = %e, "Generation failed");
                StatusCode::BAD_GATEWAY
            })?;

    Ok(Json(GuideResponse {
        topic: request.topic,
        guide: outcome.guide,
        markdown: outcome.markdown,
    }))
}

/// Batch study-guide generation request.
#[derive(Debug, Deserialize)]
pub struct BatchGuideRequest {
    pub topics: Vec<String>,
    pub top_k: Option<usize>,
}

/// Batch generation response with per-topic results.
#[derive(Debug, Serialize)]
pub struct BatchGuideResponse {
    pub total_topics: usize,
    pub generated: usize,
    pub failed: usize,
    pub guides: Vec<GuideResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Generate study guides for several topics, continuing past failures.
pub async fn generate_guide_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchGuideRequest>,
) -> Result<Json<BatchGuideResponse>, StatusCode> {
    let generator = state
        .generator
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    if request.topics.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let top_k = request.top_k.unwrap_or(state.config.top_k);
    let index = state.index.read().await;

    let (guides, summary) = pipeline::generate_guides(
        &request.topics,
        top_k,
        state.embedder.as_ref(),
        &index,
        generator.as_ref(),
    )
    .await;

    Ok(Json(BatchGuideResponse {
        total_topics: summary.total_topics,
        generated: summary.generated,
        failed: summary.failed,
        guides: guides
            .into_iter()
            .map(|g| GuideResponse {
                topic: g.topic,
                guide: g.outcome.guide,
                markdown: g.outcome.markdown,
            })
            .collect(),
        errors: summary
            .errors
            .into_iter()
            .map(|e| format!("{}: {}", e.item, e.error))
            .collect(),
    }))
}
