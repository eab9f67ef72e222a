//! Strict-JSON extraction from model output.
//!
//! Models asked for "STRICT JSON" still return prose, markdown fences, or
//! trailing commentary often enough that every agent runs its output
//! through [`extract_json_object`] before schema validation.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::backend::LlmError;

/// Extracts and parses the first JSON object in `text`.
///
/// Tries, in order: the whole text, the first fenced ```json block, and
/// finally a brace-matched scan from the first `{`. The scan tracks string
/// and escape state so braces inside string values do not unbalance it.
pub fn extract_json_object(text: &str) -> Result<Value, LlmError> {
    if text.trim().is_empty() {
        return Err(LlmError::EmptyCompletion);
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Ok(value);
        }
    }

    static FENCED: OnceLock<Regex> = OnceLock::new();
    let fenced = FENCED
        .get_or_init(|| Regex::new(r"```(?:json)?\s*\n([\s\S]*?)\n```").expect("valid block regex"));
    if let Some(caps) = fenced.captures(text) {
        if let Ok(value) = serde_json::from_str::<Value>(&caps[1]) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    let start = text.find('{').ok_or(LlmError::NoJsonObject)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + offset + 1];
                    return serde_json::from_str(candidate).map_err(LlmError::InvalidJson);
                }
            }
            _ => {}
        }
    }

    Err(LlmError::NoJsonObject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_parse() {
        let value = extract_json_object(r#"{"drug": "Metformin"}"#).unwrap();
        assert_eq!(value["drug"], "Metformin");
    }

    #[test]
    fn test_fenced_block() {
        let text = "Here is the plan:\n```json\n{\"drug\": \"Aspirin\"}\n```\nLet me know.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["drug"], "Aspirin");
    }

    #[test]
    fn test_object_embedded_in_prose() {
        let text = "Sure! The result is {\"score\": {\"value\": 7}} as requested.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["score"]["value"], 7);
    }

    #[test]
    fn test_braces_inside_strings_do_not_unbalance() {
        let text = r#"note: {"summary": "uses {braces} and a \" quote", "n": 1} end"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            extract_json_object("   \n"),
            Err(LlmError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_no_object_at_all() {
        assert!(matches!(
            extract_json_object("the model declined to answer"),
            Err(LlmError::NoJsonObject)
        ));
    }

    #[test]
    fn test_top_level_array_is_not_an_object() {
        assert!(extract_json_object("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(matches!(
            extract_json_object(r#"{"a": {"b": 1}"#),
            Err(LlmError::NoJsonObject)
        ));
    }
}
