use colored::*;
use evalgen_eval::{EvalResults, ScoreValue};

fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut out: String = flat.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// One line per sample followed by the accuracy summary.
pub fn render_table(results: &EvalResults) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<14} {:<14} {}\n",
        "sample".bold(),
        "target".bold(),
        "answer".bold(),
        "score".bold()
    ));

    for sample in &results.samples {
        let answer = sample.score.answer.as_deref().unwrap_or("-");
        let value = match sample.score.value {
            ScoreValue::Correct => "C".green().bold(),
            ScoreValue::Incorrect => "I".red().bold(),
        };
        out.push_str(&format!(
            "{:<12} {:<14} {:<14} {}",
            truncate(&sample.sample_id, 12),
            truncate(&sample.target, 14),
            truncate(answer, 14),
            value
        ));
        if let Some(explanation) = &sample.score.explanation {
            if sample.score.value == ScoreValue::Incorrect {
                out.push_str(&format!("  {}", truncate(explanation, 60).dimmed()));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} {}/{} correct, accuracy {:.3}\n",
        results.model.cyan(),
        results.correct(),
        results.total(),
        results.accuracy()
    ));
    if results.usage.total_tokens > 0 {
        out.push_str(&format!(
            "tokens: {} in, {} out\n",
            results.usage.input_tokens, results.usage.output_tokens
        ));
    }
    out
}
