//! Wire events emitted while a solving run streams progress.

use serde::{Deserialize, Serialize};

/// One frame of the progress stream.
///
/// Serialized untagged, so each variant becomes a flat JSON object the
/// consumer tells apart by its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    /// A click instruction for one answered question.
    Result {
        #[serde(rename = "questionNum")]
        question_num: u32,
        #[serde(rename = "targetId")]
        target_id: String,
    },
    /// Human-readable phase update with a progress counter.
    Status { status: String, progress: String },
    /// Terminal frame of a successful run.
    Done { done: bool },
    /// Terminal frame of a failed run.
    Error { error: String },
}

impl StreamEvent {
    pub fn status(status: impl Into<String>, progress: impl Into<String>) -> Self {
        Self::Status {
            status: status.into(),
            progress: progress.into(),
        }
    }

    pub fn result(question_num: u32, target_id: impl Into<String>) -> Self {
        Self::Result {
            question_num,
            target_id: target_id.into(),
        }
    }

    pub fn done() -> Self {
        Self::Done { done: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}
