//! Default model configs loaded strictly from environment variables.
//!
//! Two roles are used by the question-resolution pipeline:
//!
//! - **Solver**     → fast model, tight deadline, one question at a time
//! - **Extraction** → capable reasoning model for the single bulk
//!   context-extraction call over a long background document
//!
//! # Environment variables
//!
//! Common:
//! - `OPENROUTER_API_KEY` = bearer token (mandatory; startup-fatal)
//! - `OPENROUTER_URL`     = provider base URL (optional)
//! - `LLM_MAX_ATTEMPTS`   = retry cap per call (optional, default 3)
//! - `LLM_BACKOFF_BASE_MS`= initial backoff delay (optional, default 500)
//!
//! Per role:
//! - `SOLVER_MODEL`, `SOLVER_TIMEOUT_SECS` (default 15)
//! - `EXTRACTION_MODEL`, `EXTRACTION_TIMEOUT_SECS` (default 120)

use std::time::Duration;

use crate::{
    config::model_config::ModelConfig,
    error_handler::{ConfigError, LlmError, env_opt_u64, env_or, must_env},
};

const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api";
const DEFAULT_SOLVER_MODEL: &str = "arcee-ai/trinity-large-preview:free";
const DEFAULT_EXTRACTION_MODEL: &str = "deepseek/deepseek-r1-0528:free";

/// Resolves the provider base URL and validates its scheme.
fn openrouter_endpoint() -> Result<String, LlmError> {
    let url = env_or("OPENROUTER_URL", DEFAULT_ENDPOINT);
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidEndpoint(url).into());
    }
    Ok(trimmed.to_string())
}

fn retry_knobs() -> Result<(u32, Duration), LlmError> {
    let attempts = env_opt_u64("LLM_MAX_ATTEMPTS")?.unwrap_or(3) as u32;
    let base_ms = env_opt_u64("LLM_BACKOFF_BASE_MS")?.unwrap_or(500);
    Ok((attempts.max(1), Duration::from_millis(base_ms)))
}

/// Constructs the **solver** role config.
///
/// Deterministic sampling and a tight deadline: a hung call must fail
/// fast so the sequential loop keeps moving.
///
/// # Errors
/// [`ConfigError::MissingVar`] without `OPENROUTER_API_KEY`.
pub fn config_solver() -> Result<ModelConfig, LlmError> {
    let (max_attempts, backoff_base) = retry_knobs()?;
    let timeout_secs = env_opt_u64("SOLVER_TIMEOUT_SECS")?.unwrap_or(15);

    Ok(ModelConfig {
        model: env_or("SOLVER_MODEL", DEFAULT_SOLVER_MODEL),
        endpoint: openrouter_endpoint()?,
        api_key: must_env("OPENROUTER_API_KEY")?,
        temperature: Some(0.0),
        max_tokens: None,
        timeout: Duration::from_secs(timeout_secs),
        max_attempts,
        backoff_base,
    })
}

/// Constructs the **extraction** role config.
///
/// The bulk call carries the entire background document, so the
/// deadline is generous rather than absent; the call still cannot
/// hang forever.
///
/// # Errors
/// [`ConfigError::MissingVar`] without `OPENROUTER_API_KEY`.
pub fn config_extraction() -> Result<ModelConfig, LlmError> {
    let (max_attempts, backoff_base) = retry_knobs()?;
    let timeout_secs = env_opt_u64("EXTRACTION_TIMEOUT_SECS")?.unwrap_or(120);

    Ok(ModelConfig {
        model: env_or("EXTRACTION_MODEL", DEFAULT_EXTRACTION_MODEL),
        endpoint: openrouter_endpoint()?,
        api_key: must_env("OPENROUTER_API_KEY")?,
        temperature: Some(0.1),
        max_tokens: None,
        timeout: Duration::from_secs(timeout_secs),
        max_attempts,
        backoff_base,
    })
}
