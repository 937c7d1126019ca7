//! Chat-completion client for OpenRouter-style providers.
//!
//! The crate exposes one HTTP client per model role, a lenient JSON
//! payload extractor for free-form model output, and a key-status
//! probe:
//!
//! - [`ChatService`] — single non-streaming chat completion with a
//!   per-request deadline and exponential-backoff retry on 429/5xx
//!   and transport failures.
//! - [`extract_payload`] — strips reasoning blocks and markdown
//!   fences, then slices the widest `{...}` span.
//! - [`ChatProfiles`] — the two model roles used by the pipeline
//!   (`solver`: fast, tight deadline; `extraction`: capable, long
//!   deadline), constructed once from environment variables.
//! - [`KeyStatusService`] — resilient `GET /api/v1/auth/key` probe.
//!
//! Errors are normalized via the unified types in [`error_handler`].

pub mod chat_service;
pub mod config;
pub mod error_handler;
pub mod key_status;
pub mod payload;
pub mod profiles;

pub use chat_service::{ChatMessage, ChatService, backoff_delay};
pub use config::model_config::ModelConfig;
pub use error_handler::{ConfigError, LlmError, ProviderError};
pub use key_status::{KeyStatus, KeyStatusService};
pub use payload::extract_payload;
pub use profiles::ChatProfiles;
