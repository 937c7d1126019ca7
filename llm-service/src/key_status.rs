//! Key-status probe for the provider account.
//!
//! Probe: `GET {endpoint}/v1/auth/key` with Bearer auth. The returned
//! [`KeyStatus`] is JSON-serializable and suitable for a status
//! endpoint. [`KeyStatusService::check`] is resilient and never fails
//! (errors mapped to `ok = false`).

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error_handler::{ConfigError, LlmError, make_snippet};

/// A serializable snapshot of the provider key's account state.
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    /// Overall probe outcome.
    pub ok: bool,
    /// Key label as reported by the provider.
    pub label: Option<String>,
    /// Accumulated usage in account currency.
    pub usage: Option<f64>,
    /// Spending limit; `None` means unlimited/balance-based.
    pub limit: Option<f64>,
    /// Free-tier keys are subject to heavy rate limits.
    pub is_free_tier: Option<bool>,
    /// Measured HTTP latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

/// Resilient checker for the provider key endpoint.
pub struct KeyStatusService {
    client: reqwest::Client,
    url: String,
}

impl KeyStatusService {
    /// Creates a probe bound to `{endpoint}/v1/auth/key`.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidEndpoint`] for a non-http endpoint
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, LlmError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(endpoint.to_string()).into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| ConfigError::MissingVar("OPENROUTER_API_KEY"))?,
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/v1/auth/key", endpoint.trim_end_matches('/')),
        })
    }

    /// Probes the key endpoint. Never returns an error: every failure
    /// is converted into `KeyStatus { ok: false, message: ... }`.
    pub async fn check(&self) -> KeyStatus {
        let started = Instant::now();
        debug!("GET {}", self.url);

        let resp = match self.client.get(&self.url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, url = %self.url, "key probe transport failure");
                return Self::fail(started, format!("transport error: {e}"));
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, url = %self.url, "key probe returned non-success status");
            return Self::fail(
                started,
                format!("HTTP {status}: {}", make_snippet(&text)),
            );
        }

        let body: KeyResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, url = %self.url, "key probe decode failure");
                return Self::fail(started, format!("decode error: {e}"));
            }
        };

        let data = body.data;
        let status = KeyStatus {
            ok: true,
            label: data.label,
            usage: data.usage,
            limit: data.limit,
            is_free_tier: data.is_free_tier,
            latency_ms: started.elapsed().as_millis(),
            message: "key is valid".into(),
        };

        info!(
            label = %status.label.as_deref().unwrap_or("n/a"),
            free_tier = ?status.is_free_tier,
            latency_ms = status.latency_ms as u64,
            "key probe completed"
        );

        status
    }

    fn fail(started: Instant, message: String) -> KeyStatus {
        KeyStatus {
            ok: false,
            label: None,
            usage: None,
            limit: None,
            is_free_tier: None,
            latency_ms: started.elapsed().as_millis(),
            message,
        }
    }
}

/// Minimal response for `/v1/auth/key`.
#[derive(Debug, Deserialize)]
struct KeyResponse {
    data: KeyData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeyData {
    label: Option<String>,
    usage: Option<f64>,
    limit: Option<f64>,
    is_free_tier: Option<bool>,
}
