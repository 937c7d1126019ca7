//! Structured extraction over a full page DOM.
//!
//! Question containers carry the `que` class; within each container
//! the question text sits in the `qtext` node and answers are
//! radio/checkbox inputs. Display labels resolve through an explicit
//! `label for=` association first, falling back to the text of the
//! answer row (`r0`/`r1`) that holds the input.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{Question, QuestionOption, clean::strip_markup};

// The boundary after `que` keeps class names like "question-area"
// from opening a spurious container block.
static CONTAINER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="que[" ]"#).expect("container regex"));

static QTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*class="qtext"[^>]*>(.*?)</div>"#).expect("qtext regex")
});
static INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<input[^>]*type="(?:radio|checkbox)"[^>]*>"#).expect("input regex")
});
static ID_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bid="([^"]+)""#).expect("id attr regex"));
static LABEL_FOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<label[^>]*for="([^"]+)"[^>]*>(.*?)</label>"#).expect("label regex")
});
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div[^>]*class="r[01][^"]*"[^>]*>"#).expect("row regex")
});

/// True when the document carries inputs the structured strategy can
/// turn into click targets.
pub(crate) fn has_identifiable_inputs(html: &str) -> bool {
    INPUT_RE
        .find_iter(html)
        .any(|m| ID_ATTR_RE.is_match(m.as_str()))
}

/// True when the document carries question containers.
pub(crate) fn has_question_containers(html: &str) -> bool {
    CONTAINER_RE.is_match(html)
}

/// Container block bodies in document order, carved between marker
/// occurrences.
fn container_blocks(html: &str) -> Vec<&str> {
    let starts: Vec<(usize, usize)> = CONTAINER_RE
        .find_iter(html)
        .map(|m| (m.start(), m.end()))
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &(_, body))| {
            let end = starts.get(i + 1).map(|&(next, _)| next).unwrap_or(html.len());
            &html[body..end]
        })
        .collect()
}

/// Walks every question container in document order.
///
/// Container position (1-based) becomes the question number even when
/// intermediate containers are dropped for lack of options, keeping
/// numbers stable against the page.
pub(crate) fn extract(html: &str) -> Vec<Question> {
    let mut questions = Vec::new();

    for (pos, block) in container_blocks(html).iter().enumerate() {
        let number = (pos + 1) as u32;

        let text = QTEXT_RE
            .captures(block)
            .map(|c| strip_markup(&c[1]))
            .unwrap_or_default();

        let labels: Vec<(String, String)> = LABEL_FOR_RE
            .captures_iter(block)
            .map(|c| (c[1].to_string(), strip_markup(&c[2])))
            .collect();

        let rows = row_spans(block);

        let mut options = Vec::new();
        for input in INPUT_RE.find_iter(block) {
            let Some(id) = ID_ATTR_RE
                .captures(input.as_str())
                .map(|c| c[1].to_string())
            else {
                continue; // not actionable without an id
            };

            let mut label_text = labels
                .iter()
                .find(|(for_id, _)| *for_id == id)
                .map(|(_, text)| text.clone())
                .unwrap_or_default();

            if label_text.is_empty() {
                label_text = row_text(block, &rows, input.start());
            }

            options.push(QuestionOption {
                index: options.len(),
                id,
                text: label_text,
            });
        }

        if options.is_empty() {
            debug!(number, "dropping question container without options");
            continue;
        }

        questions.push(Question {
            number,
            text,
            options,
        });
    }

    questions
}

/// Byte spans of the answer rows inside one container.
fn row_spans(block: &str) -> Vec<(usize, usize)> {
    let starts: Vec<usize> = ROW_RE.find_iter(block).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(block.len());
            (start, end)
        })
        .collect()
}

/// Text of the row containing the input at `offset`, cleaned.
fn row_text(block: &str, rows: &[(usize, usize)], offset: usize) -> String {
    rows.iter()
        .find(|(start, end)| (*start..*end).contains(&offset))
        .map(|(start, end)| strip_markup(&block[*start..*end]))
        .unwrap_or_default()
}
