//! Study-guide generation: prompt construction, the generation client, and
//! output parsing.

mod client;
mod parse;
mod prompts;
mod render;

pub use client::{GenerationError, HttpGenerator, TextGenerator};
pub use parse::extract_json_from_text;
pub use prompts::{build_prompt, BEGIN_JSON_MARKER};
pub use render::render_markdown;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::types::StudyGuide;

/// Separator between retrieved chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n----\n\n";

/// Outcome of one generation call.
#[derive(Debug, Clone)]
pub struct GuideOutcome {
    /// The extracted JSON object, or `{"raw_output": ...}` when the model
    /// produced no parseable JSON.
    pub guide: Value,

    /// Markdown rendering, present when the JSON matched the guide schema.
    pub markdown: Option<String>,
}

/// Generate a study guide for a topic from its retrieved context chunks.
///
/// Builds the prompt, invokes the generation black box, and extracts the
/// JSON object from the output. A model response without parseable JSON is
/// not an error; the raw text is preserved for the caller.
pub async fn generate_study_guide(
    topic: &str,
    context_chunks: &[String],
    generator: &dyn TextGenerator,
) -> Result<GuideOutcome> {
    let context = context_chunks.join(CONTEXT_SEPARATOR);
    let prompt = build_prompt(topic, &context);

    info!(
        topic,
        context_chunks = context_chunks.len(),
        prompt_chars = prompt.chars().count(),
        "Generating study guide"
    );

    let text = generator.generate(&prompt).await?;

    let guide = match extract_json_from_text(&text) {
        Some(value) => value,
        None => {
            warn!(topic, "Generation output contained no parseable JSON");
            serde_json::json!({ "raw_output": text })
        }
    };

    let markdown = serde_json::from_value::<StudyGuide>(guide.clone())
        .ok()
        .filter(|g| !g.summary.is_empty() || !g.key_points.is_empty())
        .map(|g| render_markdown(&g));

    Ok(GuideOutcome { guide, markdown })
}
