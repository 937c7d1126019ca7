//! Lenient JSON payload extraction from free-form model output.
//!
//! Reasoning models wrap their structured answer in `<think>` blocks
//! and/or markdown code fences. [`extract_payload`] peels both away
//! and slices the widest `{...}` span of what remains. It is
//! deliberately lenient: the caller validates via `serde_json`.

use std::sync::LazyLock;

use regex::Regex;

static THINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("think regex"));
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```json").expect("fence regex"));

/// Extracts the outermost JSON object from raw model output.
///
/// Steps, in order:
/// 1. remove every `<think>...</think>` block (case-insensitive,
///    spanning newlines);
/// 2. strip ```` ```json ```` openers and remaining ```` ``` ````
///    fences;
/// 3. slice from the first `{` to the last `}` of the remainder.
///
/// Returns `None` when no brace pair survives. Idempotent on text
/// that is already a clean JSON object.
pub fn extract_payload(raw: &str) -> Option<String> {
    let no_think = THINK_RE.replace_all(raw, "");
    let no_fence = FENCE_RE.replace_all(&no_think, "").replace("```", "");

    let first = no_fence.find('{')?;
    let last = no_fence.rfind('}')?;
    if last < first {
        return None;
    }
    Some(no_fence[first..=last].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"answer": 1}"#;

    #[test]
    fn idempotent_on_clean_json() {
        assert_eq!(extract_payload(CLEAN).as_deref(), Some(CLEAN));
        let once = extract_payload(CLEAN).unwrap();
        assert_eq!(extract_payload(&once).as_deref(), Some(CLEAN));
    }

    #[test]
    fn strips_reasoning_block() {
        let raw = "<think>the first option is\nwrong {not this}</think>{\"answer\": 2}";
        assert_eq!(extract_payload(raw).as_deref(), Some("{\"answer\": 2}"));
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{\"answer\": 0}\n```";
        assert_eq!(extract_payload(raw).as_deref(), Some("{\"answer\": 0}"));
    }

    #[test]
    fn strips_both_reasoning_and_fences() {
        let raw = "<THINK>hmm</THINK>Sure!\n```json\n{\"1\": \"fact\", \"2\": \"NOT_FOUND\"}\n```\nDone.";
        assert_eq!(
            extract_payload(raw).as_deref(),
            Some("{\"1\": \"fact\", \"2\": \"NOT_FOUND\"}")
        );
    }

    #[test]
    fn takes_widest_brace_span() {
        let raw = "prefix {\"a\": {\"b\": 1}} suffix } stray";
        assert_eq!(
            extract_payload(raw).as_deref(),
            Some("{\"a\": {\"b\": 1}} suffix }")
        );
    }

    #[test]
    fn none_without_braces() {
        assert!(extract_payload("no json here").is_none());
        assert!(extract_payload("").is_none());
        assert!(extract_payload("<think>{\"answer\":1}</think>").is_none());
    }

    #[test]
    fn none_on_reversed_braces() {
        assert!(extract_payload("} {").is_none());
    }
}
