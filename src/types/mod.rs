//! Core types for the study-guide service.

mod config;
mod document;
mod guide;

pub use config::{ChunkConfig, ServiceConfig};
pub use document::{Chunk, Document};
pub use guide::{Formula, ImportantQuestion, SolvedExample, StudyGuide};
