//! Embedding backends.
//!
//! The index only needs "given texts, return vectors". Production deploys
//! point at an embedding service over HTTP; tests and offline runs use a
//! deterministic local feature-hashing embedder.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Produces embedding vectors for batches of texts.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimensionality of the vectors this embedder produces.
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Client for a remote embedding service.
pub struct RemoteEmbedder {
    client: Client,
    base_url: String,
    dimensions: usize,
    batch_size: usize,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl RemoteEmbedder {
    /// Create a new client for the given service URL.
    pub fn new(base_url: &str, dimensions: usize) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            dimensions,
            batch_size: 50,
        })
    }

    /// Set the batch size for embedding requests.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embed", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { texts })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("embedding service returned {}: {}", status, body);
        }

        let result: EmbedResponse = response.json().await?;
        if result.embeddings.len() != texts.len() {
            anyhow::bail!(
                "embedding service returned {} vectors for {} texts",
                result.embeddings.len(),
                texts.len()
            );
        }
        Ok(result.embeddings)
    }

    /// Check if the embedding service is reachable.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        info!(text_count = texts.len(), "Embedding texts via service");

        let mut all = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.embed_batch(batch).await?;
            debug!(batch_size = batch.len(), "Embedded batch");
            all.extend(vectors);
        }
        Ok(all)
    }
}

/// Deterministic local embedder based on token feature hashing.
///
/// Unigram and bigram features are hashed into a fixed number of buckets
/// with a sign and weight derived from the hash, then L2-normalized. Not a
/// semantic model, but stable, dependency-free, and good enough for offline
/// smoke runs and tests where only relative lexical similarity matters.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(8),
        }
    }

    fn features(text: &str) -> Vec<String> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        let mut features = Vec::with_capacity(words.len() * 2);
        for (i, word) in words.iter().enumerate() {
            features.push(format!("w:{word}"));
            if let Some(next) = words.get(i + 1) {
                features.push(format!("b:{word}_{next}"));
            }
        }
        features
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions];
        for feature in Self::features(text) {
            let mut hasher = DefaultHasher::new();
            feature.hash(&mut hasher);
            let hash = hasher.finish();

            let index = (hash as usize) % self.dimensions;
            let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            let weight = 1.0 + (((hash >> 48) & 0xFF) as f32 / 255.0);
            vector[index] += sign * weight;
        }
        normalize(&mut vector);
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_EMBEDDING_DIM)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Scale a vector to unit L2 norm. Zero vectors are left unchanged.
fn normalize(values: &mut [f32]) {
    let squared: f64 = values.iter().map(|v| f64::from(*v) * f64::from(*v)).sum();
    if squared <= 0.0 {
        return;
    }
    let norm = squared.sqrt() as f32;
    for value in values.iter_mut() {
        *value /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_embedder_is_deterministic() {
        let embedder = HashEmbedder::new(64);
        let texts = vec!["transmission line models".to_string()];
        let a = embedder.embed(&texts).await.unwrap();
        let b = embedder.embed(&texts).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].len(), 64);
    }

    #[tokio::test]
    async fn test_hash_embedder_normalizes() {
        let embedder = HashEmbedder::new(64);
        let texts = vec!["surge impedance loading".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();
        let norm: f32 = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_empty_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::new(32);
        let vectors = embedder.embed(&["   ".to_string()]).await.unwrap();
        assert!(vectors[0].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_minimum_dimensions_enforced() {
        let embedder = HashEmbedder::new(2);
        assert_eq!(embedder.dimensions(), 8);
    }

    #[test]
    fn test_remote_embedder_batch_size() {
        let embedder = RemoteEmbedder::new("http://localhost:3018", 384)
            .unwrap()
            .with_batch_size(100);
        assert_eq!(embedder.batch_size, 100);
        assert_eq!(embedder.dimensions(), 384);
    }
}
