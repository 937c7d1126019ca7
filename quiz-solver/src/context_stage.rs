//! Stage one: pull per-question facts out of the reference material.

use std::collections::HashMap;

use llm_service::extract_payload;
use quiz_scraper::Question;
use tracing::{debug, warn};

use crate::{backend::Completion, prompt};

/// Per-question facts keyed by the question number rendered as a string.
pub type ContextMap = HashMap<String, String>;

/// Runs the bulk extraction call.
///
/// This stage is best-effort: any failure (transport, exhausted
/// retries, unparseable reply) degrades to an empty map so the solver
/// stage still runs on question text alone.
pub async fn extract_context<B: Completion>(
    backend: &B,
    questions: &[Question],
    context_doc: &str,
) -> ContextMap {
    if context_doc.trim().is_empty() {
        debug!("no reference material configured, skipping context stage");
        return ContextMap::new();
    }

    let messages = prompt::context_extraction(questions, context_doc);
    let raw = match backend.complete(&messages).await {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "context extraction call failed");
            return ContextMap::new();
        }
    };

    let Some(payload) = extract_payload(&raw) else {
        warn!("context extraction reply carried no JSON object");
        return ContextMap::new();
    };

    match serde_json::from_str::<ContextMap>(&payload) {
        Ok(map) => {
            debug!(entries = map.len(), "context extraction complete");
            map
        }
        Err(err) => {
            warn!(error = %err, "context extraction reply was not a string map");
            ContextMap::new()
        }
    }
}

/// Facts usable for one question, filtering the not-found sentinel.
pub fn facts_for<'a>(context: &'a ContextMap, number: u32) -> Option<&'a str> {
    context
        .get(&number.to_string())
        .map(String::as_str)
        .filter(|facts| !facts.trim().is_empty() && *facts != prompt::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facts_for_filters_sentinel_and_blank() {
        let mut map = ContextMap::new();
        map.insert("1".to_string(), "Useful fact.".to_string());
        map.insert("2".to_string(), prompt::NOT_FOUND.to_string());
        map.insert("3".to_string(), "   ".to_string());

        assert_eq!(facts_for(&map, 1), Some("Useful fact."));
        assert_eq!(facts_for(&map, 2), None);
        assert_eq!(facts_for(&map, 3), None);
        assert_eq!(facts_for(&map, 4), None);
    }
}
