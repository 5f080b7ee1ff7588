//! Schema validation for parsed model output
//!
//! Rules are checked in a fixed order and the first failure wins:
//! 1. the value is a JSON object
//! 2. `category`, `sentiment` and `reply` are all present
//! 3. `category` is one of the allowed categories
//! 4. `sentiment` is one of the allowed sentiments
//! 5. `reply` is a string that is not blank
//! 6. `reply` has at most [`MAX_REPLY_CHARS`] characters
//!
//! Additional keys are tolerated and dropped from the typed result.

use serde_json::{Map, Value};
use supportline_core::{Category, ClassificationResult, Sentiment, MAX_REPLY_CHARS};

/// Keys every model answer must carry, in checking order
pub const REQUIRED_KEYS: [&str; 3] = ["category", "sentiment", "reply"];

/// Why a parsed value failed validation
///
/// The `Display` output is the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("Output is not a JSON object.")]
    NotAnObject,

    #[error("Missing key: {0}")]
    MissingKey(&'static str),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid sentiment: {0}")]
    InvalidSentiment(String),

    #[error("Reply is empty or not a string.")]
    EmptyReply,

    #[error("Reply is too long.")]
    ReplyTooLong { chars: usize },
}

/// Check a parsed value against the result schema
///
/// On success the typed result is returned, so a caller can never hold a value
/// that passed validation without also satisfying the schema.
pub fn validate_result(value: &Value) -> Result<ClassificationResult, SchemaViolation> {
    let object = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(SchemaViolation::MissingKey(key));
        }
    }

    let category = label_of(object, "category")
        .and_then(Category::from_label)
        .ok_or_else(|| SchemaViolation::InvalidCategory(describe(&object["category"])))?;

    let sentiment = label_of(object, "sentiment")
        .and_then(Sentiment::from_label)
        .ok_or_else(|| SchemaViolation::InvalidSentiment(describe(&object["sentiment"])))?;

    let reply = match object["reply"].as_str() {
        Some(reply) if !reply.trim().is_empty() => reply,
        _ => return Err(SchemaViolation::EmptyReply),
    };

    let chars = reply.chars().count();
    if chars > MAX_REPLY_CHARS {
        return Err(SchemaViolation::ReplyTooLong { chars });
    }

    Ok(ClassificationResult::new(category, sentiment, reply))
}

/// Boolean form of [`validate_result`] with its reason string
pub fn check(value: &Value) -> (bool, String) {
    match validate_result(value) {
        Ok(_) => (true, "OK".to_string()),
        Err(violation) => (false, violation.to_string()),
    }
}

fn label_of<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
