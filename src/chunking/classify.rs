//! Structural classification of paragraphs.
//!
//! Two pure predicates drive the assembler's policy decisions: heading
//! detection (so headings stay attached to the content they introduce) and
//! math detection (so LaTeX spans are never split across chunks). Both are
//! heuristics over the paragraph text, with no state and no side effects.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

lazy_static! {
    /// Recognized math span patterns. Non-greedy and allowed to cross
    /// newlines, since a display equation may span several lines.
    static ref MATH_PATTERNS: Vec<Regex> = vec![
        // inline math: $ ... $
        Regex::new(r"(?s)\$.*?\$").unwrap(),
        // \( ... \)
        Regex::new(r"(?s)\\\(.*?\\\)").unwrap(),
        // \[ ... \]
        Regex::new(r"(?s)\\\[.*?\\\]").unwrap(),
        // equation / align environments
        Regex::new(r"(?s)\\begin\{equation\}.*?\\end\{equation\}").unwrap(),
        Regex::new(r"(?s)\\begin\{align\}.*?\\end\{align\}").unwrap(),
    ];
}

/// Maximum length (in characters) for a paragraph to qualify as a heading.
const MAX_HEADING_CHARS: usize = 120;

/// True when the paragraph contains a mathematical expression span.
pub fn contains_math(paragraph: &str) -> bool {
    MATH_PATTERNS.iter().any(|pattern| pattern.is_match(paragraph))
}

/// Heuristic heading detection: a short line that is all-caps, title-case,
/// or ends with a colon.
///
/// The three sub-rules are independent ORs; each only ever asserts
/// "heading", so there are no conflicting verdicts to tie-break.
pub fn is_heading(paragraph: &str) -> bool {
    let s = paragraph.trim();
    if s.is_empty() || s.chars().count() > MAX_HEADING_CHARS {
        return false;
    }

    let word_count = s.split_whitespace().count();

    if is_all_caps(s) && word_count < 8 {
        return true;
    }
    if is_title_case(s) && word_count < 6 {
        return true;
    }
    if s.ends_with(':') && word_count < 8 {
        return true;
    }

    false
}

/// True when the text has at least one cased character and none of them
/// are lowercase.
fn is_all_caps(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// True when every cased run starts uppercase and continues lowercase.
/// A non-alphabetic character inside a word (an apostrophe, a digit)
/// restarts the uppercase requirement, so "Ohm's Law" is not title case.
/// Words with no alphabetic characters are ignored.
fn is_title_case(s: &str) -> bool {
    let mut has_word = false;
    for word in s.unicode_words() {
        let mut expect_upper = true;
        for c in word.chars() {
            if c.is_alphabetic() {
                if expect_upper {
                    if !c.is_uppercase() {
                        return false;
                    }
                } else if !c.is_lowercase() {
                    return false;
                }
                expect_upper = false;
                has_word = true;
            } else {
                expect_upper = true;
            }
        }
    }
    has_word
}
