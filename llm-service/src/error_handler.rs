//! Unified error handling for `llm-service`.
//!
//! One top-level [`LlmError`] for the whole crate, with domain errors
//! grouped in nested enums ([`ConfigError`], [`ProviderError`]).
//! Helpers for reading environment variables return the unified
//! [`Result<T>`] alias.
//!
//! Messages carry the `[LLM Service]` prefix to simplify attribution
//! in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration/validation errors (startup-fatal).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Upstream provider errors (HTTP status, decode, empty payload).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (connection refused, DNS, ...).
    #[error("[LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// The request exceeded the configured deadline.
    #[error("[LLM Service] request timed out after {0:?}")]
    Timeout(Duration),

    /// The retry budget is spent; `last` is the final attempt's error.
    #[error("[LLM Service] upstream still failing after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts performed, including the first.
        attempts: u32,
        /// Error from the last attempt.
        last: Box<LlmError>,
    },
}

impl LlmError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Retryable: transport failures, timeouts, HTTP 429 and 5xx.
    /// Everything else (other 4xx, decode failures, config) is
    /// definitive and fails immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::HttpTransport(_) | LlmError::Timeout(_) => true,
            LlmError::Provider(ProviderError::HttpStatus { status, .. }) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors that happen at config load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (timeouts, attempt caps, ...).
    #[error("[LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `SOLVER_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Endpoint was empty or missing an http/https scheme.
    #[error("[LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Upstream provider failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short trimmed snippet of the response body.
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[LLM Service] decode error: {0}")]
    Decode(String),

    /// Completion response carried no usable `choices[..].message.content`.
    #[error("[LLM Service] empty choices in completion response")]
    EmptyChoices,
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or
/// empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Reads an optional env variable, falling back to `dflt` when unset
/// or empty.
pub fn env_or(name: &str, dflt: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => dflt.to_string(),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but
/// not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            LlmError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

/// Trims a response body down to a short single-line snippet for logs
/// and error messages.
pub fn make_snippet(text: &str) -> String {
    const MAX: usize = 240;
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= MAX {
        flat
    } else {
        let mut end = MAX;
        while end > 0 && !flat.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &flat[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        let e429 = LlmError::Provider(ProviderError::HttpStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            url: "u".into(),
            snippet: String::new(),
        });
        let e503 = LlmError::Provider(ProviderError::HttpStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: "u".into(),
            snippet: String::new(),
        });
        let e401 = LlmError::Provider(ProviderError::HttpStatus {
            status: StatusCode::UNAUTHORIZED,
            url: "u".into(),
            snippet: String::new(),
        });
        assert!(e429.is_retryable());
        assert!(e503.is_retryable());
        assert!(!e401.is_retryable());
        assert!(LlmError::Timeout(Duration::from_secs(15)).is_retryable());
        assert!(!LlmError::Provider(ProviderError::EmptyChoices).is_retryable());
    }

    #[test]
    fn snippet_is_flattened_and_bounded() {
        let s = make_snippet("  a\n  b\t c  ");
        assert_eq!(s, "a b c");
        let long = "x".repeat(1000);
        assert!(make_snippet(&long).len() <= 250);
    }
}
