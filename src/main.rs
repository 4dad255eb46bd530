//! Study Guide Service - Main Entry Point
//!
//! Retrieval-augmented study-guide generation over ingested course notes.

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studygen::api::handlers::{self, AppState};
use studygen::generate::{HttpGenerator, TextGenerator};
use studygen::index::{Embedder, HashEmbedder, RemoteEmbedder, VectorIndex};
use studygen::types::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "studygen=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env();

    info!("Starting Study Guide Service v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Chunking at {} chars with {} overlap",
        config.max_chars, config.overlap_chars
    );

    // Initialize components
    let embedder: Arc<dyn Embedder> = match &config.embedding_service_url {
        Some(url) => {
            info!("Using remote embedding service at {}", url);
            Arc::new(RemoteEmbedder::new(url, config.embedding_dimensions)?)
        }
        None => {
            info!("No embedding service configured, using local hash embedder");
            Arc::new(HashEmbedder::new(config.embedding_dimensions))
        }
    };

    let generator: Option<Arc<dyn TextGenerator>> = match &config.generation_service_url {
        Some(url) => {
            info!(
                "Using generation service at {} (model {})",
                url, config.generation_model
            );
            Some(Arc::new(HttpGenerator::new(url, &config.generation_model)))
        }
        None => {
            info!("No generation service configured, guide endpoints disabled");
            None
        }
    };

    let index = VectorIndex::load_or_empty(&config.index_dir, config.embedding_dimensions);
    if !index.is_empty() {
        info!("Loaded {} indexed chunks from {:?}", index.len(), config.index_dir);
    }

    let state = Arc::new(AppState {
        config,
        index: RwLock::new(index),
        embedder,
        generator,
    });

    // Build HTTP routes
    let app = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ingestion
        .route("/documents", post(handlers::ingest_documents))
        .route("/chunk", post(handlers::preview_chunks))
        // Retrieval
        .route("/search", post(handlers::search))
        // Generation
        .route("/guides", post(handlers::generate_guide))
        .route("/guides/batch", post(handlers::generate_guide_batch))
        // State
        .with_state(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3021);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
