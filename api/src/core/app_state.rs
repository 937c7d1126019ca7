use std::env;

use llm_service::ChatProfiles;
use quiz_solver::Pacing;
use tracing::{info, warn};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Configured chat backends plus the key status probe.
    pub profiles: ChatProfiles,
    /// Reference material fed to the context-extraction stage.
    /// Empty when no `CONTEXT_FILE` is configured.
    pub context_doc: String,
    /// Inter-question delay applied by the solving loop.
    pub pacing: Pacing,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let profiles = ChatProfiles::from_env()?;

        let context_doc = match env::var("CONTEXT_FILE") {
            Ok(path) => {
                let doc = std::fs::read_to_string(&path)
                    .map_err(|source| AppError::ContextFile { path: path.clone(), source })?;
                info!(path = %path, bytes = doc.len(), "loaded context file");
                doc
            }
            Err(_) => {
                warn!("CONTEXT_FILE not set, solving without reference material");
                String::new()
            }
        };

        Ok(Self {
            profiles,
            context_doc,
            pacing: Pacing::default(),
        })
    }
}
