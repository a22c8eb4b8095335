use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

pub const MAX_SUMMARY_CHARS: usize = 3000;

/// A strategy returns `None` when it does not apply to the content and
/// `Some(text)` once it has decided. A decided but blank text still ends the
/// chain as unusable.
type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: [(&str, Strategy); 4] = [
    ("closed_field", closed_summary_field),
    ("truncated_field", truncated_summary_field),
    ("fenced_json", fenced_json_document),
    ("raw_passthrough", raw_passthrough),
];

/// Pulls `summary_text` out of a generation response. Returns `None` when the
/// response holds nothing usable, so the caller can fall back.
pub fn extract_summary(content: &str) -> Option<String> {
    if content.is_empty() {
        return None;
    }

    let (strategy, text) = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(content).map(|text| (*name, text)))?;

    debug!(strategy, "weekly summary extracted");

    let bounded = text.chars().take(MAX_SUMMARY_CHARS).collect::<String>();
    (!bounded.trim().is_empty()).then_some(bounded)
}

fn closed_field_regex() -> &'static Regex {
    static CLOSED_FIELD_RE: OnceLock<Regex> = OnceLock::new();
    CLOSED_FIELD_RE.get_or_init(|| {
        Regex::new(r#"(?s)"summary_text"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("closed summary field regex should compile")
    })
}

fn truncated_field_regex() -> &'static Regex {
    static TRUNCATED_FIELD_RE: OnceLock<Regex> = OnceLock::new();
    TRUNCATED_FIELD_RE.get_or_init(|| {
        Regex::new(r#"(?s)"summary_text"\s*:\s*"((?:[^"\\]|\\.)*)"#)
            .expect("truncated summary field regex should compile")
    })
}

fn closed_summary_field(content: &str) -> Option<String> {
    closed_field_regex()
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|value| unescape_fragment(value.as_str()))
}

fn truncated_summary_field(content: &str) -> Option<String> {
    truncated_field_regex()
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|value| unescape_fragment(value.as_str()))
}

fn fenced_json_document(content: &str) -> Option<String> {
    match serde_json::from_str::<Value>(strip_code_fence(content)) {
        Ok(Value::Object(map)) => match map.get("summary_text") {
            None => Some(String::new()),
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => None,
        },
        _ => None,
    }
}

fn raw_passthrough(content: &str) -> Option<String> {
    warn!(
        chars = content.chars().count(),
        "summary_text parsing failed, using raw response"
    );
    Some(content.to_string())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let opened = trimmed
        .strip_prefix("```")
        .map(|rest| rest.trim_start_matches(|ch: char| ch.is_ascii_alphanumeric()))
        .unwrap_or(trimmed);

    opened.trim().strip_suffix("```").unwrap_or(opened).trim()
}

fn unescape_fragment(raw: &str) -> String {
    let mut unescaped = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            unescaped.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('"') => unescaped.push('"'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }

    unescaped
}

#[cfg(test)]
mod tests {
    use super::{MAX_SUMMARY_CHARS, extract_summary, strip_code_fence};

    #[test]
    fn plain_json_object() {
        assert_eq!(
            extract_summary(r#"{"summary_text": "hello"}"#).as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn json_inside_code_fence() {
        let content = "```json\n{\"summary_text\": \"hello\"}\n```";
        assert_eq!(extract_summary(content).as_deref(), Some("hello"));
    }

    #[test]
    fn truncated_response_keeps_partial_value() {
        assert_eq!(
            extract_summary(r#"{"summary_text": "hel"#).as_deref(),
            Some("hel")
        );
    }

    #[test]
    fn escapes_are_decoded() {
        let content = r#"{"summary_text": "🌤️ Calm week.\n💡 Say \"thanks\" \\ rest."}"#;
        assert_eq!(
            extract_summary(content).as_deref(),
            Some("🌤️ Calm week.\n💡 Say \"thanks\" \\ rest.")
        );
    }

    #[test]
    fn escaped_key_is_found_by_json_parsing() {
        let content = "```\n{\"summary_\\u0074ext\": \"parsed\"}\n```";
        assert_eq!(extract_summary(content).as_deref(), Some("parsed"));
    }

    #[test]
    fn garbage_is_passed_through_truncated() {
        assert_eq!(
            extract_summary("The week went fine overall.").as_deref(),
            Some("The week went fine overall.")
        );

        let long = "가".repeat(MAX_SUMMARY_CHARS + 500);
        let extracted = extract_summary(&long).expect("raw text used");
        assert_eq!(extracted.chars().count(), MAX_SUMMARY_CHARS);
    }

    #[test]
    fn long_field_value_is_truncated() {
        let content = format!(r#"{{"summary_text": "{}"}}"#, "a".repeat(MAX_SUMMARY_CHARS + 1));
        assert_eq!(
            extract_summary(&content).map(|text| text.len()),
            Some(MAX_SUMMARY_CHARS)
        );
    }

    #[test]
    fn empty_and_blank_results_are_unusable() {
        assert_eq!(extract_summary(""), None);
        assert_eq!(extract_summary("   \n "), None);
        assert_eq!(extract_summary(r#"{"summary_text": "   "}"#), None);
        assert_eq!(extract_summary(r#"{"other": "value"}"#), None);
    }

    #[test]
    fn non_string_field_falls_back_to_raw_response() {
        for content in [r#"{"summary_text": null}"#, r#"{"summary_text": 42}"#] {
            assert_eq!(extract_summary(content).as_deref(), Some(content));
        }
    }

    #[test]
    fn code_fence_markers_are_stripped() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence(" {} "), "{}");
    }
}
