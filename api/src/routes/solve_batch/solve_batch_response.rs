use serde::Serialize;

/// Body of a successful `POST /solve/batch`.
#[derive(Debug, Serialize)]
pub struct SolveBatchResponse {
    pub success: bool,
    /// Click targets in question order.
    pub targets: Vec<String>,
}
