//! Chunk assembly: the core state machine.
//!
//! The assembler folds the normalized paragraph sequence into bounded-size
//! chunks while enforcing three policies:
//!
//! - headings are attached to the content that follows them, never emitted
//!   as useless standalone chunks;
//! - math-bearing paragraphs are atomic and never split, even when one alone
//!   exceeds the size budget (it then becomes its own oversized chunk);
//! - when an ordinary paragraph overflows the accumulator, the new chunk
//!   starts with whole sentences carried over from the tail of the previous
//!   one, bounded by `overlap_chars`, so retrieval context survives the seam.

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::classify::{contains_math, is_heading};
use super::normalize::normalize_paragraphs;
use crate::types::ChunkConfig;

lazy_static! {
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Length in characters (Unicode scalar values, not bytes).
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split text into chunks suitable for embedding and retrieval.
///
/// This is the single entry point for the chunking core. Empty or
/// whitespace-only input yields an empty vector; the only error is an
/// invalid configuration (`max_chars == 0`).
pub fn split_into_chunks(text: &str, config: &ChunkConfig) -> Result<Vec<String>> {
    if config.max_chars == 0 {
        bail!("max_chars must be positive");
    }

    let mut assembler = ChunkAssembler::new(config);
    for paragraph in normalize_paragraphs(text) {
        assembler.push(&paragraph);
    }
    Ok(assembler.finish())
}

/// Stateful accumulator that consumes paragraphs in document order and
/// produces the ordered chunk sequence.
pub struct ChunkAssembler<'a> {
    config: &'a ChunkConfig,
    /// Chunk under construction.
    cur: String,
    /// Completed chunks, in source order.
    chunks: Vec<String>,
}

impl<'a> ChunkAssembler<'a> {
    pub fn new(config: &'a ChunkConfig) -> Self {
        Self {
            config,
            cur: String::new(),
            chunks: Vec::new(),
        }
    }

    /// Feed the next paragraph through the transition rules.
    pub fn push(&mut self, paragraph: &str) {
        if is_heading(paragraph) {
            self.push_heading(paragraph);
        } else if contains_math(paragraph) {
            self.push_math(paragraph);
        } else {
            self.push_ordinary(paragraph);
        }
    }

    /// Flush any remaining accumulator content, then trim each chunk and
    /// drop anything at or below the minimum viable length.
    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        let min = self.config.min_chunk_chars;
        self.chunks
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| char_len(c) > min)
            .collect()
    }

    /// A heading joins the current chunk whenever it fits; otherwise the
    /// chunk is flushed and the heading opens the next one. Either way the
    /// heading is never emitted on its own.
    fn push_heading(&mut self, paragraph: &str) {
        if self.cur.is_empty()
            || char_len(&self.cur) + char_len(paragraph) + 2 <= self.config.max_chars
        {
            self.append(paragraph);
        } else {
            self.flush();
            self.cur.push_str(paragraph);
        }
    }

    /// Math paragraphs are indivisible. One that exceeds the budget on its
    /// own is emitted verbatim as a standalone chunk; otherwise it joins the
    /// accumulator, which is flushed immediately if the addition pushed it
    /// over the budget.
    fn push_math(&mut self, paragraph: &str) {
        let para_len = char_len(paragraph);

        if !self.cur.is_empty()
            && char_len(&self.cur) + para_len + 2 > self.config.max_chars
        {
            self.flush();
        }

        if para_len > self.config.max_chars {
            self.flush();
            self.chunks.push(paragraph.to_string());
        } else {
            self.append(paragraph);
            if char_len(&self.cur) > self.config.max_chars {
                self.flush();
            }
        }
    }

    /// Ordinary paragraphs fill the accumulator until it would overflow,
    /// at which point the chunk is flushed and the next one opens with the
    /// sentence-level overlap carried from its tail.
    fn push_ordinary(&mut self, paragraph: &str) {
        if self.cur.is_empty() {
            self.cur.push_str(paragraph);
        } else if char_len(&self.cur) + char_len(paragraph) + 2 <= self.config.max_chars {
            self.append(paragraph);
        } else {
            let overlap = self.tail_overlap();
            self.flush();
            if overlap.is_empty() {
                self.cur.push_str(paragraph);
            } else {
                self.cur.push_str(&overlap);
                self.cur.push_str("\n\n");
                self.cur.push_str(paragraph);
            }
        }
    }

    /// Collect whole sentences from the end of the accumulator, preserving
    /// their original order, stopping before the running length would exceed
    /// `overlap_chars`. May return an empty string when even the last
    /// sentence is too long to carry over.
    fn tail_overlap(&self) -> String {
        let mut overlap = String::new();
        for sentence in split_sentences(&self.cur).iter().rev() {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            let candidate = if overlap.is_empty() {
                sentence.to_string()
            } else {
                format!("{} {}", sentence, overlap)
            };
            if char_len(&candidate) > self.config.overlap_chars {
                break;
            }
            overlap = candidate;
        }
        overlap
    }

    /// Join a paragraph onto the accumulator with a blank-line separator.
    fn append(&mut self, paragraph: &str) {
        if !self.cur.is_empty() {
            self.cur.push_str("\n\n");
        }
        self.cur.push_str(paragraph);
    }

    /// Emit the accumulator as a completed chunk, collapsing newline runs.
    fn flush(&mut self) {
        let trimmed = self.cur.trim();
        if !trimmed.is_empty() {
            self.chunks
                .push(EXCESS_NEWLINES.replace_all(trimmed, "\n\n").into_owned());
        }
        self.cur.clear();
    }
}

/// Split text at sentence boundaries: whitespace immediately following a
/// `.`, `?`, or `!`. The boundary whitespace is consumed.
///
/// Deliberately simplistic: abbreviations and decimal numbers are not
/// special-cased. Overlap only needs best-effort sentence granularity.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);

        if matches!(c, '.' | '?' | '!')
            && chars.peek().map_or(false, |next| next.is_whitespace())
        {
            sentences.push(current.clone());
            current.clear();
            while chars.peek().map_or(false, |next| next.is_whitespace()) {
                chars.next();
            }
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(max_chars: usize, overlap_chars: usize) -> ChunkConfig {
        ChunkConfig {
            max_chars,
            overlap_chars,
            ..ChunkConfig::default()
        }
    }

    #[test]
    fn test_empty_input() {
        let chunks = split_into_chunks("", &ChunkConfig::default()).unwrap();
        assert!(chunks.is_empty());

        let chunks = split_into_chunks("  \n\n \t ", &ChunkConfig::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = config(0, 200);
        assert!(split_into_chunks("some text", &bad).is_err());
    }

    #[test]
    fn test_single_sentence_single_chunk() {
        let text = "This sentence has around fifty characters in it, ok.";
        let chunks = split_into_chunks(text, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_tiny_input_filtered() {
        // At or below 30 trimmed characters is noise, not a chunk.
        let chunks = split_into_chunks("Too short to keep.", &ChunkConfig::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_heading_attached_to_following_content() {
        let text = "Transmission Line Models\n\nShort lines neglect capacitance entirely and work well below 80 km.";
        let chunks = split_into_chunks(text, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("Transmission Line Models"));
        assert!(chunks[0].contains("neglect capacitance"));
    }

    #[test]
    fn test_heading_never_standalone_when_attachable() {
        let body = "Body sentence that follows the heading and is long enough to keep. ".repeat(3);
        let text = format!("SECTION ONE\n\n{}", body.trim());
        let chunks = split_into_chunks(&text, &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("SECTION ONE"));
    }

    #[test]
    fn test_math_paragraph_never_split() {
        let math = "\\[\nA = 1 + \\frac{ZY}{2}\n\\]";
        let filler = "An ordinary paragraph with enough text to matter for the budget. ".repeat(4);
        // Overlap budget below the math span length, so the carried-over
        // tail never duplicates it into the following chunk.
        let text = format!("{}\n\n{}\n\n{}", filler.trim(), math, filler.trim());
        let chunks = split_into_chunks(&text, &config(300, 20)).unwrap();

        // The full math paragraph appears unbroken in exactly one chunk.
        let normalized_math = "\\[ A = 1 + \\frac{ZY}{2} \\]";
        let holders: Vec<&String> = chunks
            .iter()
            .filter(|c| c.contains(normalized_math))
            .collect();
        assert_eq!(holders.len(), 1);
    }

    #[test]
    fn test_oversized_math_emitted_verbatim() {
        let terms: Vec<String> = (0..40).map(|i| format!("x_{{{i}}}^2", i = i)).collect();
        let math = format!("\\[ {} \\]", terms.join(" + "));
        assert!(math.chars().count() > 100);

        let chunks = split_into_chunks(&math, &config(100, 20)).unwrap();
        assert_eq!(chunks.len(), 1);
        // Atomicity wins over the size bound: the chunk stays oversized.
        assert_eq!(chunks[0], math);
        assert!(chunks[0].chars().count() > 100);
    }

    #[test]
    fn test_size_bound_for_ordinary_content() {
        let para = "Every sentence in this paragraph is plain prose about power flow. ".repeat(3);
        let text = format!("{}\n\n{}\n\n{}", para.trim(), para.trim(), para.trim());
        let cfg = config(300, 80);
        let chunks = split_into_chunks(&text, &cfg).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= cfg.max_chars);
        }
    }

    #[test]
    fn test_overlap_carries_tail_sentences() {
        let first = "Alpha statement number one is here. Beta statement number two is here.";
        let second = "Gamma statement number three continues the discussion with more prose to overflow.";
        let text = format!("{}\n\n{}", first, second);
        let cfg = config(90, 40);
        let chunks = split_into_chunks(&text, &cfg).unwrap();

        assert_eq!(chunks.len(), 2);
        // The second chunk opens with whole sentences from the tail of the
        // first, each ending in terminal punctuation before the new content.
        assert!(chunks[1].starts_with("Beta statement number two is here."));
        let overlap_end = chunks[1].find("\n\n").unwrap();
        assert!(chunks[1][..overlap_end].chars().count() <= cfg.overlap_chars);
        assert!(chunks[1].contains("Gamma statement"));
    }

    #[test]
    fn test_zero_overlap_is_valid() {
        let first = "Alpha statement number one is here. Beta statement number two is here.";
        let second = "Gamma statement number three continues with plenty of additional prose.";
        let text = format!("{}\n\n{}", first, second);
        // Overlap budget too small for even one sentence.
        let chunks = split_into_chunks(&text, &config(90, 10)).unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].starts_with("Gamma statement"));
    }

    #[test]
    fn test_transmission_line_notes_scenario() {
        let text = "Transmission Line Models\n\n\
            Short lines neglect capacitance and are valid for lengths up to about eighty kilometers in practice.\n\n\
            The nominal pi model uses series impedance Z = R + jX together with shunt admittance Y = jB over two.\n\n\
            \\[\nA = 1 + \\frac{ZY}{2}\n\\]\n\n\
            Surge Impedance Loading (SIL) is the natural loading level where reactive power balance holds along the line.";
        let chunks = split_into_chunks(text, &config(160, 20)).unwrap();

        assert!(chunks.len() >= 3);

        // Heading rides with the first following paragraph.
        assert!(chunks[0].starts_with("Transmission Line Models"));
        assert!(chunks[0].contains("Short lines neglect capacitance"));

        // The math block survives unbroken in exactly one chunk.
        let math = "\\[ A = 1 + \\frac{ZY}{2} \\]";
        assert_eq!(chunks.iter().filter(|c| c.contains(math)).count(), 1);

        // No paragraph content is lost.
        let all = chunks.join("\n\n");
        assert!(all.contains("Z = R + jX"));
        assert!(all.contains("Surge Impedance Loading"));
    }

    #[test]
    fn test_content_coverage() {
        let paras: Vec<String> = (0..12)
            .map(|i| format!("Distinct sentence number {} talks about topic {} at length here.", i, i))
            .collect();
        let text = paras.join("\n\n");
        let chunks = split_into_chunks(&text, &config(200, 60)).unwrap();

        let all = chunks.join("\n\n");
        for para in &paras {
            assert!(all.contains(para.as_str()), "lost paragraph: {}", para);
        }
    }

    #[test]
    fn test_chunk_order_matches_source_order() {
        let paras: Vec<String> = (0..10)
            .map(|i| format!("Marker{:02} paragraph with sufficient length to be retained easily.", i))
            .collect();
        let text = paras.join("\n\n");
        let chunks = split_into_chunks(&text, &config(150, 0)).unwrap();

        let mut last_pos = 0;
        let all = chunks.join("\n\n");
        for i in 0..10 {
            let marker = format!("Marker{:02}", i);
            let pos = all.find(&marker).expect("marker missing");
            assert!(pos >= last_pos, "chunks out of source order");
            last_pos = pos;
        }
    }

    #[test]
    fn test_newline_collapse_is_idempotent() {
        let chunks =
            split_into_chunks("First paragraph of reasonable length right here.\n\n\n\nSecond paragraph of reasonable length.", &ChunkConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].contains("\n\n\n"));
        // Re-collapsing changes nothing.
        let again = EXCESS_NEWLINES.replace_all(&chunks[0], "\n\n");
        assert_eq!(again.as_ref(), chunks[0].as_str());
    }

    #[test]
    fn test_split_sentences_boundaries() {
        let parts = split_sentences("One sentence here. Another one? Yes! Trailing bit");
        assert_eq!(
            parts,
            vec![
                "One sentence here.".to_string(),
                "Another one?".to_string(),
                "Yes!".to_string(),
                "Trailing bit".to_string(),
            ]
        );
    }

    #[test]
    fn test_split_sentences_ignores_decimals() {
        let parts = split_sentences("The value is 3.14 exactly. Next sentence.");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "The value is 3.14 exactly.");
    }
}
