//! The chunking core: paragraph normalization, structural classification,
//! and chunk assembly.

mod assembler;
mod classify;
mod normalize;

pub use assembler::{split_into_chunks, split_sentences, ChunkAssembler};
pub use classify::{contains_math, is_heading};
pub use normalize::normalize_paragraphs;
