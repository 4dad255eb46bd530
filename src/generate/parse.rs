//! JSON extraction from generated text.
//!
//! Models wrap their JSON in prose, echo the prompt, or emit several brace
//! groups. The extractor scans for the first balanced `{...}` span that
//! parses, falling back to a greedy brace match.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref BRACE_SPAN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Extract the first JSON object found in `text`, or `None`.
pub fn extract_json_from_text(text: &str) -> Option<Value> {
    let mut start: Option<usize> = None;
    let mut depth: usize = 0;

    for (i, c) in text.char_indices() {
        match c {
            '{' => {
                if start.is_none() {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start {
                            let candidate = &text[s..i + 1];
                            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                                return Some(value);
                            }
                        }
                        // Not valid JSON, keep scanning past this span.
                        start = None;
                    }
                }
            }
            _ => {}
        }
    }

    // Greedy fallback: first '{' through last '}'.
    BRACE_SPAN
        .find(text)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
}
