//! Rendering results for the terminal

use serde::Serialize;
use supportline_core::{Category, ClassificationResult, Sentiment};

#[derive(Serialize)]
struct Labels {
    categories: Vec<&'static str>,
    sentiments: Vec<&'static str>,
}

/// Human-readable result
pub fn render_text(result: &ClassificationResult) -> String {
    format!(
        "Category:  {}\nSentiment: {}\nReply:     {}",
        result.category, result.sentiment, result.reply
    )
}

/// Pretty-printed JSON with exactly the three result keys
pub fn render_json(result: &ClassificationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Allowed vocabularies, as text or JSON
pub fn render_labels(json: bool) -> serde_json::Result<String> {
    let labels = Labels {
        categories: Category::labels(),
        sentiments: Sentiment::labels(),
    };

    if json {
        return serde_json::to_string_pretty(&labels);
    }

    Ok(format!(
        "Categories: {}\nSentiments: {}",
        labels.categories.join(", "),
        labels.sentiments.join(", ")
    ))
}
