//! HTML question extraction for multiple-choice quiz pages.
//!
//! Two strategies behind one [`extract`] entry point:
//!
//! - [`SourceKind::Structured`] — the full page DOM is available:
//!   walk question containers, pull the question-text node, collect
//!   radio/checkbox inputs and resolve their display labels.
//! - [`SourceKind::Fragment`] — partial or broken HTML (copy-pasted
//!   snippet): split on question-boundary markers and scrape texts
//!   with pattern matching.
//!
//! Zero extractable questions is a valid empty result, not an error.

mod clean;
mod fragment;
mod structured;

pub use clean::{clean_text, strip_markup};

/// One selectable answer option.
///
/// `id` is the opaque handle used later to perform the answer action;
/// it uniquely identifies an actionable element in the original
/// document and is never reused across questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    /// 0-based position within the question, stable.
    pub index: usize,
    /// Opaque click handle.
    pub id: String,
    /// Cleaned display text.
    pub text: String,
}

/// One extracted question. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based container position in document order.
    pub number: u32,
    /// Cleaned question text.
    pub text: String,
    /// At least one option; zero-option containers are dropped.
    pub options: Vec<QuestionOption>,
}

/// Which extraction strategy applies to a given input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Full DOM with question containers and actionable inputs.
    Structured,
    /// Partial snippet; only texts are recoverable.
    Fragment,
}

impl SourceKind {
    /// Explicit discriminator: structured when question containers
    /// and identifiable inputs are both present.
    pub fn detect(html: &str) -> Self {
        if structured::has_question_containers(html) && structured::has_identifiable_inputs(html) {
            SourceKind::Structured
        } else {
            SourceKind::Fragment
        }
    }
}

/// Extracts the ordered question list from raw HTML.
///
/// Strategy selection is [`SourceKind::detect`]; both strategies share
/// the same text-cleaning rules. Questions with zero discoverable
/// options are dropped.
pub fn extract(html: &str) -> Vec<Question> {
    let kind = SourceKind::detect(html);
    let questions = match kind {
        SourceKind::Structured => structured::extract(html),
        SourceKind::Fragment => fragment::extract(html),
    };
    tracing::debug!(
        strategy = ?kind,
        questions = questions.len(),
        "question extraction finished"
    );
    questions
}

/// Substrings following each occurrence of `marker`, in order.
///
/// Mirrors `text.split(marker)` with the leading prefix discarded;
/// used by both strategies to carve question blocks.
pub(crate) fn split_after<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(marker) {
        rest = &rest[pos + marker.len()..];
        let end = rest.find(marker).unwrap_or(rest.len());
        out.push(&rest[..end]);
        if end == rest.len() {
            break;
        }
    }
    out
}
