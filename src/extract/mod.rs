//! Recovers a JSON value from free-form generation output.
//!
//! Tiers run cheapest first and each is callable on its own:
//! fence stripping, lenient direct parse, then bracket rescue.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::{error::PipelineError, utils::StripCodeBlock};

/// Shape the caller is waiting for; selects the rescue tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Array,
    Object,
}

impl Expect {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Expect::Array => value.is_array(),
            Expect::Object => value.is_object(),
        }
    }

    fn delimiters(&self) -> (char, char) {
        match self {
            Expect::Array => ('[', ']'),
            Expect::Object => ('{', '}'),
        }
    }
}

/// Extracts the JSON payload of a response, failing with
/// `MalformedResponse` (carrying the raw text) when every tier fails.
/// A document of the wrong shape counts as a failed tier, so an object
/// wrapping the rows falls through to the bracket rescue.
pub fn extract_json(raw: &str, expect: Expect) -> Result<Value, PipelineError> {
    let stripped = raw.strip_code_block();
    let text = stripped.trim();

    if let Some(value) = parse_lenient(text).filter(|v| expect.matches(v)) {
        debug!("response parsed directly");
        return Ok(value);
    }

    if let Some(value) = rescue_span(text, expect)
        .and_then(parse_lenient)
        .filter(|v| expect.matches(v))
    {
        debug!("response recovered from bracket span");
        return Ok(value);
    }

    Err(PipelineError::MalformedResponse {
        raw: raw.to_owned(),
    })
}

/// Full-document parse that tolerates raw control characters inside string
/// literals. Trailing data is not accepted.
pub fn parse_lenient(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }
    match escape_control_chars(text) {
        Cow::Owned(repaired) => serde_json::from_str(&repaired).ok(),
        Cow::Borrowed(_) => None,
    }
}

/// Greedy span from the first opening delimiter to the last closing one.
pub fn rescue_span(text: &str, expect: Expect) -> Option<&str> {
    let (open, close) = expect.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Escapes control characters that appear inside JSON string literals.
/// Characters outside strings are left alone.
pub fn escape_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut in_string = false;
    let mut escaped = false;
    let mut changed = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => {
                    changed = true;
                    out.push_str("\\n");
                }
                '\r' => {
                    changed = true;
                    out.push_str("\\r");
                }
                '\t' => {
                    changed = true;
                    out.push_str("\\t");
                }
                c if c.is_control() => {
                    changed = true;
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_clean_array() {
        let value = extract_json(r#"[{"a": 1}]"#, Expect::Array).unwrap();
        assert_eq!(value, json!([{"a": 1}]));
    }

    #[test]
    fn strips_fences_before_parsing() {
        let raw = "```json\n[{\"단계\": \"작업준비\"}]\n```";
        let value = extract_json(raw, Expect::Array).unwrap();
        assert_eq!(value, json!([{"단계": "작업준비"}]));
    }

    #[test]
    fn tolerates_raw_newlines_inside_strings() {
        let raw = "[{\"대책\": \"- 하나\n- 둘\"}]";
        assert!(serde_json::from_str::<Value>(raw).is_err());
        let value = extract_json(raw, Expect::Array).unwrap();
        assert_eq!(value, json!([{"대책": "- 하나\n- 둘"}]));
    }

    #[test]
    fn newlines_between_tokens_are_untouched() {
        let raw = "[\n  {\"a\": \"x\"},\n  {\"a\": \"y\"}\n]";
        assert!(matches!(escape_control_chars(raw), Cow::Borrowed(_)));
        assert_eq!(parse_lenient(raw), Some(json!([{"a": "x"}, {"a": "y"}])));
    }

    #[test]
    fn rescues_array_from_chatter() {
        let raw = "네, 요청하신 평가표입니다:\n[{\"a\": 1}, {\"a\": 2}]\n도움이 되길 바랍니다.";
        let value = extract_json(raw, Expect::Array).unwrap();
        assert_eq!(value, json!([{"a": 1}, {"a": 2}]));
    }

    #[test]
    fn rescues_array_with_trailing_data() {
        let raw = "[1, 2] 끝";
        assert_eq!(extract_json(raw, Expect::Array).unwrap(), json!([1, 2]));
    }

    #[test]
    fn scalar_prefix_does_not_shadow_the_array() {
        let raw = "42 items: [{\"a\": 1}]";
        assert_eq!(extract_json(raw, Expect::Array).unwrap(), json!([{"a": 1}]));
    }

    #[test]
    fn rescues_object_for_recommendations() {
        let raw = "추천 결과: {\"protectors\": \"안전모\"} 이상입니다.";
        let value = extract_json(raw, Expect::Object).unwrap();
        assert_eq!(value, json!({"protectors": "안전모"}));
    }

    #[test]
    fn wrapped_array_is_rescued_from_object() {
        let raw = r#"{"rows": [{"a": 1}]}"#;
        assert_eq!(extract_json(raw, Expect::Array).unwrap(), json!([{"a": 1}]));
    }

    #[test]
    fn bracketless_text_is_malformed() {
        let raw = "죄송합니다. {\"a\": 1} 형식으로는 답할 수 없습니다.";
        let err = extract_json(raw, Expect::Array).unwrap_err();
        assert_eq!(err.raw_response(), Some(raw));
    }

    #[test]
    fn empty_text_is_malformed() {
        assert!(matches!(
            extract_json("   ", Expect::Array),
            Err(PipelineError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn reversed_brackets_are_not_a_span() {
        assert_eq!(rescue_span("] then [", Expect::Array), None);
    }
}
