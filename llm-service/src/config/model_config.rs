use std::time::Duration;

/// Configuration for one model role.
///
/// Read once at startup and treated as immutable for the process
/// lifetime; every service that needs it takes a clone or a shared
/// reference.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model identifier (e.g., `"deepseek/deepseek-r1-0528:free"`).
    pub model: String,

    /// Provider base URL (e.g., `https://openrouter.ai/api`).
    /// Endpoints are derived from it:
    /// - POST `{endpoint}/v1/chat/completions`
    /// - GET  `{endpoint}/v1/auth/key`
    pub endpoint: String,

    /// Bearer token. Required; construction fails without it.
    pub api_key: String,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Per-request deadline. Solver calls fail fast (default 15s);
    /// extraction calls get a long window instead of none so the
    /// pipeline can never hang.
    pub timeout: Duration,

    /// Total attempts per call, including the first (default 3).
    pub max_attempts: u32,

    /// Initial backoff delay; doubles on each retried attempt.
    pub backoff_base: Duration,
}
