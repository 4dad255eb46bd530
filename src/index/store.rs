//! Flat vector index with positional chunk metadata.
//!
//! Brute-force L2 nearest-neighbor search over all stored vectors, persisted
//! as two files in the index directory: `meta.json` holding the ordered chunk
//! texts and `vectors.bin` holding the dimension header plus the packed
//! little-endian `f32` vectors. Positions in the two files correspond, so a
//! search hit maps straight back to its chunk text.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

const META_FILE: &str = "meta.json";
const VECTORS_FILE: &str = "vectors.bin";

/// In-memory vector index over chunk texts.
pub struct VectorIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
    entries: Vec<String>,
}

impl VectorIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimensionality this index expects.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Append chunk texts with their embeddings, keeping positional
    /// correspondence between the two sequences.
    pub fn add(&mut self, texts: Vec<String>, embeddings: Vec<Vec<f32>>) -> Result<()> {
        if texts.len() != embeddings.len() {
            bail!(
                "got {} texts but {} embeddings",
                texts.len(),
                embeddings.len()
            );
        }
        for embedding in &embeddings {
            if embedding.len() != self.dim {
                bail!(
                    "embedding dimension {} does not match index dimension {}",
                    embedding.len(),
                    self.dim
                );
            }
        }

        self.entries.extend(texts);
        self.vectors.extend(embeddings);
        Ok(())
    }

    /// Return the texts of the `k` nearest chunks by L2 distance.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<String> {
        if query.len() != self.dim || k == 0 {
            return vec![];
        }

        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (l2_distance_squared(query, v), i))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(_, i)| self.entries[i].clone())
            .collect()
    }

    /// Persist the index to a directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create index directory {}", dir.display()))?;

        let meta = serde_json::to_string_pretty(&self.entries)?;
        fs::write(dir.join(META_FILE), meta).context("failed to write chunk metadata")?;

        let mut blob = Vec::with_capacity(4 + self.vectors.len() * self.dim * 4);
        blob.extend_from_slice(&(self.dim as u32).to_le_bytes());
        for vector in &self.vectors {
            for value in vector {
                blob.extend_from_slice(&value.to_le_bytes());
            }
        }
        fs::write(dir.join(VECTORS_FILE), blob).context("failed to write vectors")?;

        info!(chunks = self.len(), dir = %dir.display(), "Saved index");
        Ok(())
    }

    /// Load an index previously written by [`VectorIndex::save`].
    pub fn load(dir: &Path) -> Result<Self> {
        let meta = fs::read_to_string(dir.join(META_FILE))
            .with_context(|| format!("failed to read {}", dir.join(META_FILE).display()))?;
        let entries: Vec<String> =
            serde_json::from_str(&meta).context("chunk metadata is not valid JSON")?;

        let blob =
            fs::read(dir.join(VECTORS_FILE)).context("failed to read vector blob")?;
        if blob.len() < 4 {
            bail!("vector blob is truncated");
        }
        let dim = u32::from_le_bytes([blob[0], blob[1], blob[2], blob[3]]) as usize;
        let body = &blob[4..];

        if dim == 0 || body.len() != entries.len() * dim * 4 {
            bail!(
                "vector blob length {} does not match {} entries of dimension {}",
                body.len(),
                entries.len(),
                dim
            );
        }

        let mut vectors = Vec::with_capacity(entries.len());
        for chunk in body.chunks_exact(dim * 4) {
            let mut vector = Vec::with_capacity(dim);
            for bytes in chunk.chunks_exact(4) {
                vector.push(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]));
            }
            vectors.push(vector);
        }

        info!(chunks = entries.len(), dim, dir = %dir.display(), "Loaded index");
        Ok(Self {
            dim,
            vectors,
            entries,
        })
    }

    /// Load the index from `dir` if one is present, otherwise start empty.
    pub fn load_or_empty(dir: &Path, dim: usize) -> Self {
        if dir.join(META_FILE).exists() && dir.join(VECTORS_FILE).exists() {
            match Self::load(dir) {
                Ok(index) => return index,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load existing index, starting empty");
                }
            }
        }
        Self::new(dim)
    }
}

fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Embedder, HashEmbedder};
    use pretty_assertions::assert_eq;

    async fn build_index(texts: &[&str]) -> (VectorIndex, HashEmbedder) {
        let embedder = HashEmbedder::new(64);
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let embeddings = embedder.embed(&texts).await.unwrap();
        let mut index = VectorIndex::new(embedder.dimensions());
        index.add(texts, embeddings).unwrap();
        (index, embedder)
    }

    #[tokio::test]
    async fn test_search_returns_lexically_nearest_chunk() {
        let (index, embedder) = build_index(&[
            "Transmission line models describe short medium and long lines.",
            "Synchronous machines and excitation systems.",
            "Economic dispatch and unit commitment problems.",
        ])
        .await;

        let query = embedder
            .embed(&["transmission line models".to_string()])
            .await
            .unwrap();
        let results = index.search(&query[0], 1);
        assert_eq!(results.len(), 1);
        assert!(results[0].contains("Transmission line models"));
    }

    #[tokio::test]
    async fn test_search_k_bounds() {
        let (index, embedder) = build_index(&["alpha beta", "gamma delta"]).await;
        let query = embedder.embed(&["alpha".to_string()]).await.unwrap();

        assert!(index.search(&query[0], 0).is_empty());
        assert_eq!(index.search(&query[0], 10).len(), 2);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let mut index = VectorIndex::new(8);
        let err = index.add(vec!["text".to_string()], vec![vec![0.0; 4]]);
        assert!(err.is_err());

        let err = index.add(vec!["text".to_string()], vec![]);
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let (index, embedder) = build_index(&[
            "Surge impedance loading of a lossless line.",
            "Reactive power compensation with shunt capacitors.",
        ])
        .await;

        let dir = tempfile::tempdir().unwrap();
        index.save(dir.path()).unwrap();

        let loaded = VectorIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.dim(), index.dim());

        // Search results survive the round trip.
        let query = embedder
            .embed(&["surge impedance".to_string()])
            .await
            .unwrap();
        assert_eq!(index.search(&query[0], 1), loaded.search(&query[0], 1));
    }

    #[test]
    fn test_load_or_empty_on_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let index = VectorIndex::load_or_empty(&dir.path().join("nope"), 16);
        assert!(index.is_empty());
        assert_eq!(index.dim(), 16);
    }
}
