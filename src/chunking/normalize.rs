//! Paragraph normalization for raw extracted note text.
//!
//! OCR and PDF text extraction emit hard line breaks wherever the page
//! wrapped, so a sentence routinely spans several physical lines. The
//! normalizer undoes that wrapping while keeping the author's real
//! paragraph boundaries (blank lines) intact.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One or more blank lines (whitespace-only allowed) between blocks.
    static ref BLOCK_SEPARATOR: Regex = Regex::new(r"\n\s*\n").unwrap();
    /// Terminal punctuation at the end of a buffered line, with optional
    /// trailing space. A line ending this way completes a sentence unit.
    static ref TERMINAL_PUNCT: Regex = Regex::new(r#"[.!?:"\)\]]\s*$"#).unwrap();
}

/// Turn raw page text into an ordered list of paragraphs.
///
/// The text is first split on blank-line boundaries. Within each block,
/// consecutive lines are merged back into sentence-level units: a line that
/// does not end in terminal punctuation is treated as a wrapped continuation
/// and joined to the next line with a single space; a line that does ends the
/// unit. Empty blocks contribute nothing, and output order follows the
/// document's reading order.
pub fn normalize_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();

    for block in BLOCK_SEPARATOR.split(text) {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            continue;
        }

        let mut buf = String::new();
        for line in lines {
            if buf.is_empty() {
                buf.push_str(line);
            } else if TERMINAL_PUNCT.is_match(&buf) {
                // Previous line completed a sentence; start a new unit.
                paragraphs.push(buf.trim().to_string());
                buf = line.to_string();
            } else {
                // Likely word-wrapped, concatenate with a space.
                buf.push(' ');
                buf.push_str(line);
            }
        }

        let remainder = buf.trim();
        if !remainder.is_empty() {
            paragraphs.push(remainder.to_string());
        }
    }

    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        assert!(normalize_paragraphs("").is_empty());
        assert!(normalize_paragraphs("   \n\n  \n").is_empty());
    }

    #[test]
    fn test_blank_line_boundaries() {
        let text = "First paragraph.\n\nSecond paragraph.\n\n\nThird paragraph.";
        let paras = normalize_paragraphs(text);
        assert_eq!(
            paras,
            vec![
                "First paragraph.".to_string(),
                "Second paragraph.".to_string(),
                "Third paragraph.".to_string(),
            ]
        );
    }

    #[test]
    fn test_wrapped_lines_merged() {
        let text = "The transmission line can be modeled\nas a two-port network with\nseries impedance.";
        let paras = normalize_paragraphs(text);
        assert_eq!(
            paras,
            vec!["The transmission line can be modeled as a two-port network with series impedance.".to_string()]
        );
    }

    #[test]
    fn test_terminal_punctuation_splits_block() {
        // Two sentences on separate lines within one block stay separate
        // paragraphs because the first line ends in a period.
        let text = "Short lines neglect capacitance.\nMedium lines lump it at the ends.";
        let paras = normalize_paragraphs(text);
        assert_eq!(
            paras,
            vec![
                "Short lines neglect capacitance.".to_string(),
                "Medium lines lump it at the ends.".to_string(),
            ]
        );
    }

    #[test]
    fn test_colon_and_bracket_endings_flush() {
        let text = "Consider the following:\ncase one holds";
        let paras = normalize_paragraphs(text);
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0], "Consider the following:");

        let text = "(see figure 3)\nThe result follows";
        assert_eq!(normalize_paragraphs(text).len(), 2);
    }

    #[test]
    fn test_whitespace_only_lines_discarded() {
        let text = "A sentence here.\n   \nAnother one there.";
        // The whitespace-only line acts as a blank-line separator.
        let paras = normalize_paragraphs(text);
        assert_eq!(paras.len(), 2);
    }

    #[test]
    fn test_order_preserved() {
        let text = "Alpha.\n\nBeta.\n\nGamma.";
        let paras = normalize_paragraphs(text);
        assert_eq!(paras, vec!["Alpha.", "Beta.", "Gamma."]);
    }
}
