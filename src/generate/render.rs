//! Markdown rendering of study guides.

use crate::types::StudyGuide;

/// Render a study guide as a Markdown document.
pub fn render_markdown(guide: &StudyGuide) -> String {
    let mut md: Vec<String> = Vec::new();

    let topic = if guide.topic.is_empty() {
        "Untitled"
    } else {
        &guide.topic
    };
    md.push(format!("# {}\n", topic));

    md.push("## Summary".to_string());
    md.push(guide.summary.trim().to_string());

    if !guide.key_points.is_empty() {
        md.push("\n## Key Points".to_string());
        for point in &guide.key_points {
            md.push(format!("- {}", point));
        }
    }

    if !guide.formulas.is_empty() {
        md.push("\n## Formulas".to_string());
        for f in &guide.formulas {
            md.push(format!(
                "- **{}** ({}) — {} [{}]",
                f.name, f.latex, f.meaning, f.units
            ));
        }
    }

    if !guide.important_questions.is_empty() {
        md.push("\n## Important Questions".to_string());
        for q in &guide.important_questions {
            md.push(format!(
                "- **Q:** {}\n  - *Why important:* {}  \n  - *Difficulty:* {}",
                q.q, q.why_important, q.difficulty
            ));
        }
    }

    if !guide.solved_examples.is_empty() {
        md.push("\n## Solved Examples".to_string());
        for ex in &guide.solved_examples {
            md.push(format!("### {}", ex.question));
            for step in &ex.solution_steps {
                md.push(format!("1. {}", step));
            }
            md.push(format!("**Final Answer:** {}\n", ex.final_answer));
        }
    }

    md.join("\n")
}
