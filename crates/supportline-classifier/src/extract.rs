//! Locating and parsing the JSON object inside a raw model response
//!
//! Models sometimes wrap their answer in prose or code fences. Extraction is
//! deliberately permissive: it takes everything from the first `{` to the last `}`.
//! Several brace-delimited fragments in one response are therefore captured
//! together and will usually fail to parse, which sends the pipeline down the
//! correction path.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static pattern is valid"))
}

/// Find the substring most likely to be a JSON object
///
/// Returns `None` for empty text or text without a `{ ... }` pair.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.starts_with('{') && text.ends_with('}') {
        return Some(text);
    }

    object_pattern().find(text).map(|m| m.as_str().trim())
}

/// Parse an extracted candidate into a JSON value
///
/// Never fails: missing candidates and syntax errors both become `None`.
pub fn parse_candidate(candidate: Option<&str>) -> Option<Value> {
    let candidate = candidate?;
    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "Extracted candidate is not valid JSON");
            None
        }
    }
}

/// Extract and parse in one step
pub fn parse_model_json(text: &str) -> Option<Value> {
    parse_candidate(extract_json_object(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_object_is_returned_unchanged() {
        let text = r#"{"category":"Spam","sentiment":"Neutral","reply":"Thanks."}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let text = "\n  {\"a\": 1}  \n";
        assert_eq!(extract_json_object(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let text = r#"Sure! {"category":"Spam","sentiment":"Neutral","reply":"Thanks."} Hope that helps."#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"category":"Spam","sentiment":"Neutral","reply":"Thanks."}"#)
        );
    }

    #[test]
    fn test_markdown_fence_is_stripped() {
        let text = "```json\n{\n  \"category\": \"Complaint\"\n}\n```";
        assert_eq!(
            extract_json_object(text),
            Some("{\n  \"category\": \"Complaint\"\n}")
        );
    }

    #[test]
    fn test_no_braces_yields_none() {
        assert_eq!(extract_json_object("I could not classify this message."), None);
        assert_eq!(extract_json_object(""), None);
        assert_eq!(extract_json_object("   "), None);
        assert_eq!(extract_json_object("only an opening { brace"), None);
    }

    #[test]
    fn test_match_is_greedy_to_last_brace() {
        let text = r#"first {"a": 1} then {"b": 2} done"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a": 1} then {"b": 2}"#));
        assert_eq!(parse_model_json(text), None);
    }

    #[test]
    fn test_parse_candidate() {
        assert_eq!(parse_candidate(None), None);
        assert_eq!(parse_candidate(Some("{not json}")), None);
        assert_eq!(parse_candidate(Some(r#"{"a": [1, 2]}"#)), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_parse_model_json_tolerates_prose() {
        let value = parse_model_json("Here you go:\n{\"reply\": \"Hi\"}\nThanks").unwrap();
        assert_eq!(value, json!({"reply": "Hi"}));
    }
}
