//! Fragment extraction for partial markup pasted out of a page.
//!
//! Fragments carry no reliable DOM shape, so this strategy works off
//! text patterns alone: split into question chunks, grab whatever
//! option text a chunk offers, and only trust input ids when they line
//! up one-to-one with the recovered options.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{Question, QuestionOption, clean::strip_markup, split_after};

const MISSING_TEXT: &str = "(question text not found)";
const CLEAR_CHOICE: &str = "Clear my choice";

static QTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="qtext"[^>]*>(.*?)</div>"#).expect("qtext regex")
});
static FLEX_FILL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="[^"]*flex-fill[^"]*"[^>]*>(.*?)</div>"#)
        .expect("flex-fill regex")
});
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<label[^>]*>(.*?)</label>"#).expect("label regex"));
static INPUT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<input[^>]*type="(?:radio|checkbox)"[^>]*\bid="([^"]+)""#)
        .expect("input id regex")
});

pub(crate) fn extract(html: &str) -> Vec<Question> {
    let chunks = {
        let by_id = split_after(html, "id=\"question-");
        if by_id.is_empty() {
            split_after(html, "class=\"que ")
        } else {
            by_id
        }
    };

    let mut questions = Vec::new();

    // Block position becomes the question number, as in the
    // structured strategy, so numbers stay stable when a chunk
    // without options is dropped.
    for (pos, chunk) in chunks.iter().enumerate() {
        let number = (pos + 1) as u32;

        let text = QTEXT_RE
            .captures(chunk)
            .map(|c| strip_markup(&c[1]))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| MISSING_TEXT.to_string());

        let texts = option_texts(chunk);
        if texts.is_empty() {
            debug!(number, "dropping fragment chunk without options");
            continue;
        }

        let ids: Vec<String> = INPUT_ID_RE
            .captures_iter(chunk)
            .map(|c| c[1].to_string())
            .collect();
        let ids_usable = ids.len() == texts.len();

        let options = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| QuestionOption {
                index: i,
                id: if ids_usable {
                    ids[i].clone()
                } else {
                    format!("q{number}-opt{i}")
                },
                text,
            })
            .collect();

        questions.push(Question {
            number,
            text,
            options,
        });
    }

    questions
}

/// Option texts for one chunk, deduplicated in first-seen order.
fn option_texts(chunk: &str) -> Vec<String> {
    let mut texts: Vec<String> = FLEX_FILL_RE
        .captures_iter(chunk)
        .map(|c| strip_markup(&c[1]))
        .collect();
    if texts.is_empty() {
        texts = LABEL_RE
            .captures_iter(chunk)
            .map(|c| strip_markup(&c[1]))
            .collect();
    }

    let mut seen = Vec::new();
    for text in texts {
        if text.is_empty() || text == CLEAR_CHOICE {
            continue;
        }
        if !seen.contains(&text) {
            seen.push(text);
        }
    }
    seen
}
