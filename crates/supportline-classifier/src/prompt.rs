//! Prompt templates for the classification and correction attempts

use supportline_core::{Category, Sentiment};

/// Instructions for the first attempt, listing the allowed vocabularies verbatim
pub fn instruction_prompt(categories: &[Category], sentiments: &[Sentiment]) -> String {
    let categories = render_labels(categories.iter().map(Category::as_str));
    let sentiments = render_labels(sentiments.iter().map(Sentiment::as_str));

    format!(
        "You are a customer support assistant.\n\
         \n\
         You will receive a single customer message.\n\
         Your job:\n\
         1) Assign exactly ONE category\n\
         2) Assign exactly ONE sentiment\n\
         3) Write a short, professional auto-reply\n\
         \n\
         Allowed categories (must match exactly):\n\
         {categories}\n\
         \n\
         Allowed sentiments (must match exactly):\n\
         {sentiments}\n\
         \n\
         Output rules (very important):\n\
         - Output MUST be valid JSON ONLY (no markdown, no extra text, no code fences).\n\
         - JSON must have exactly these keys: \"category\", \"sentiment\", \"reply\"\n\
         - \"reply\" must be short, professional, and relevant to the message."
    )
}

/// Full input for the first attempt: instructions followed by the customer message
pub fn classification_input(instructions: &str, message: &str) -> String {
    format!("{instructions}\n\nCustomer message:\n{message}")
}

/// Asks the model to repair its previous, unusable output
pub fn correction_prompt(previous_output: &str) -> String {
    format!(
        "Your previous output was not valid JSON or did not follow the schema.\n\
         \n\
         Fix it and return ONLY valid JSON with keys:\n\
         \"category\", \"sentiment\", \"reply\"\n\
         \n\
         Here is the previous output:\n\
         {previous_output}"
    )
    .trim()
    .to_string()
}

fn render_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    let quoted: Vec<String> = labels.map(|label| format!("\"{label}\"")).collect();
    format!("[{}]", quoted.join(", "))
}
