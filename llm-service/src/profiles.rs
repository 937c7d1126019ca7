//! The two model roles used by the question-resolution pipeline.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and pass clones to
//!   dependents; configuration is immutable afterwards.
//! - `solver` answers one question per call under a tight deadline;
//!   `extraction` handles the single bulk context call.

use std::sync::Arc;

use tracing::info;

use crate::{
    chat_service::ChatService,
    config::default_config::{config_extraction, config_solver},
    error_handler::LlmError,
    key_status::{KeyStatus, KeyStatusService},
};

/// Shared façade over the per-role chat services and the key probe.
pub struct ChatProfiles {
    solver: Arc<ChatService>,
    extraction: Arc<ChatService>,
    key: KeyStatusService,
}

impl ChatProfiles {
    /// Builds both role configs from environment variables.
    ///
    /// # Errors
    /// Returns [`LlmError::Config`] when `OPENROUTER_API_KEY` is
    /// absent — the process must not serve requests without it.
    pub fn from_env() -> Result<Self, LlmError> {
        let solver_cfg = config_solver()?;
        let extraction_cfg = config_extraction()?;

        let key = KeyStatusService::new(&solver_cfg.endpoint, &solver_cfg.api_key)?;

        info!(
            solver_model = %solver_cfg.model,
            extraction_model = %extraction_cfg.model,
            "chat profiles configured"
        );

        Ok(Self {
            solver: Arc::new(ChatService::new(solver_cfg)?),
            extraction: Arc::new(ChatService::new(extraction_cfg)?),
            key,
        })
    }

    /// The fast per-question solver service.
    pub fn solver(&self) -> Arc<ChatService> {
        Arc::clone(&self.solver)
    }

    /// The bulk context-extraction service.
    pub fn extraction(&self) -> Arc<ChatService> {
        Arc::clone(&self.extraction)
    }

    /// Probes the provider key; never fails.
    pub async fn key_status(&self) -> KeyStatus {
        self.key.check().await
    }
}
