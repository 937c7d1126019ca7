use serde::Deserialize;

/// Body of `POST /solve` and `POST /solve/batch`.
#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub html: Option<String>,
}

impl SolveRequest {
    /// The HTML payload, rejecting absent or blank bodies.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref().filter(|html| !html.trim().is_empty())
    }
}
