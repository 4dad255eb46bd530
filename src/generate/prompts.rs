//! Prompt construction for study-guide generation.

use lazy_static::lazy_static;
use serde_json::json;

/// Marker after which the model must begin its JSON object.
pub const BEGIN_JSON_MARKER: &str = "<<<BEGIN_JSON>>>";

/// Strict schema instructions matching the study-guide data model exactly.
const SCHEMA_INSTRUCTIONS: &str = "Return EXACTLY one JSON object with these keys: \
topic, summary, key_points, formulas, important_questions, solved_examples.\n\n\
Constraints:\n\
- summary: 3-6 concise sentences.\n\
- key_points: list of short strings (6-10 preferred).\n\
- formulas: list of objects {\"latex\",\"name\",\"meaning\",\"units\"} (can be []).\n\
- important_questions: list of objects {\"q\",\"why_important\",\"difficulty\"}.\n\
- solved_examples: list of objects {\"question\",\"solution_steps\",\"final_answer\"}.\n\n\
MUSTs:\n\
1) Output JSON ONLY. No explanation, no commentary, no extra text.\n\
2) The JSON MUST begin immediately after the marker <<<BEGIN_JSON>>> on a new line with '{'.\n\
3) Use double quotes for all keys and string values (valid JSON).\n";

lazy_static! {
    /// A compact few-shot example the model can imitate.
    static ref EXAMPLE_TEXT: String = json!({
        "topic": "EXAMPLE_TOPIC",
        "summary": "A short 3-sentence summary showing the style and concision required.",
        "key_points": ["Point A", "Point B", "Point C"],
        "formulas": [
            {"latex": "V=IR", "name": "Ohm's law", "meaning": "Relates voltage, current and resistance", "units": "V,A,Ohm"}
        ],
        "important_questions": [
            {"q": "State Ohm's law.", "why_important": "Fundamental relation used in circuits", "difficulty": "easy"}
        ],
        "solved_examples": [
            {"question": "Find I when V=10V and R=2 Ohm", "solution_steps": ["I = V/R", "I = 10/2 = 5 A"], "final_answer": "5 A"}
        ]
    })
    .to_string();
}

/// Build the full generation prompt from a topic and its retrieved context.
///
/// The returned string is fed to the generation backend exactly as-is.
pub fn build_prompt(topic: &str, context: &str) -> String {
    format!(
        "You are a concise study-guide generator.\n\n\
         Context (source notes):\n\
         {context}\n\n\
         Requested topic: {topic}\n\n\
         {instructions}\n\
         Example of the exact JSON format to output (copy structure):\n\n\
         {example}\n\n\
         Now produce the study-guide for the requested topic.\n\
         You MUST output JSON ONLY. Begin the JSON object immediately after the marker below.\n\
         DO NOT write anything before the marker.\n\n\
         {marker}\n\
         {{\n\
         \x20 \"topic\": \"\",\n\
         \x20 \"summary\": \"\",\n\
         \x20 \"key_points\": [],\n\
         \x20 \"formulas\": [],\n\
         \x20 \"important_questions\": [],\n\
         \x20 \"solved_examples\": []\n\
         }}\n",
        context = context,
        topic = topic,
        instructions = SCHEMA_INSTRUCTIONS,
        example = *EXAMPLE_TEXT,
        marker = BEGIN_JSON_MARKER,
    )
}
