//! Study-guide data model.
//!
//! Mirrors the JSON schema the generation prompt asks for. Every field
//! defaults when missing, because validating model output is not this
//! service's job; a partially filled guide still renders.

use serde::{Deserialize, Serialize};

/// A structured study guide for one topic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyGuide {
    #[serde(default)]
    pub topic: String,

    /// 3-6 concise sentences
    #[serde(default)]
    pub summary: String,

    /// Short bullet strings, 6-10 preferred
    #[serde(default)]
    pub key_points: Vec<String>,

    #[serde(default)]
    pub formulas: Vec<Formula>,

    #[serde(default)]
    pub important_questions: Vec<ImportantQuestion>,

    #[serde(default)]
    pub solved_examples: Vec<SolvedExample>,
}

/// A formula entry within a study guide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Formula {
    #[serde(default)]
    pub latex: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub meaning: String,

    #[serde(default)]
    pub units: String,
}

/// An exam-relevant question with rationale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportantQuestion {
    #[serde(default)]
    pub q: String,

    #[serde(default)]
    pub why_important: String,

    #[serde(default)]
    pub difficulty: String,
}

/// A worked example with stepwise solution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolvedExample {
    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub solution_steps: Vec<String>,

    #[serde(default)]
    pub final_answer: String,
}
