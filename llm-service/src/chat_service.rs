//! Chat-completion client with deadline and exponential-backoff retry.
//!
//! Thin wrapper around `POST {endpoint}/v1/chat/completions`:
//! - the configured deadline aborts a hung call and counts as a
//!   transport failure;
//! - HTTP 429/5xx and transport failures retry with a doubling delay
//!   up to the configured attempt cap;
//! - any other 4xx fails immediately (not transient).
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    config::model_config::ModelConfig,
    error_handler::{ConfigError, LlmError, ProviderError, make_snippet},
};

/// One chat message of a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// One of: "system" | "user" | "assistant".
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Backoff delay before retrying `attempt` (1-based): `base * 2^(attempt-1)`.
///
/// Pure so the retry schedule is testable without a clock.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(1u32 << (attempt.saturating_sub(1)).min(16))
}

/// Retry driver shared by every completion call.
///
/// Runs `call` up to `max_attempts` times, sleeping the doubling
/// backoff between retryable failures. Non-retryable errors surface
/// immediately; once the cap is spent the last error is wrapped in
/// [`LlmError::RetriesExhausted`].
pub(crate) async fn run_with_retry<F, Fut>(
    max_attempts: u32,
    backoff_base: Duration,
    mut call: F,
) -> Result<String, LlmError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String, LlmError>>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match call(attempt).await {
            Ok(content) => return Ok(content),
            Err(err) if err.is_retryable() => {
                if attempt >= max_attempts {
                    error!(attempts = attempt, error = %err, "retry budget exhausted");
                    return Err(LlmError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                let delay = backoff_delay(attempt, backoff_base);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient upstream failure, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Non-streaming chat-completion client for one model role.
///
/// Constructed from a complete [`ModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (deadline and default headers).
#[derive(Debug)]
pub struct ChatService {
    client: reqwest::Client,
    cfg: ModelConfig,
    url_chat: String,
}

impl ChatService {
    /// Creates a new [`ChatService`] from the given config.
    ///
    /// Validates the endpoint scheme and the API key, then builds an
    /// HTTP client with default headers and the configured deadline.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidEndpoint`] if `cfg.endpoint` lacks an http scheme
    /// - [`ConfigError::MissingVar`] if the API key is empty
    /// - [`LlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: ModelConfig) -> Result<Self, LlmError> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }
        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("OPENROUTER_API_KEY").into());
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key)).map_err(|e| {
                ProviderError::Decode(format!("invalid API key header: {e}"))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        // OpenRouter attribution headers.
        headers.insert(
            "HTTP-Referer",
            header::HeaderValue::from_static("http://localhost:3000"),
        );
        headers.insert(
            "X-Title",
            header::HeaderValue::from_static("Quiz-Solver"),
        );

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout.as_secs(),
            max_attempts = cfg.max_attempts,
            "ChatService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Performs a **non-streaming** chat completion with retry.
    ///
    /// Retries on 429/5xx and transport failures (deadline included),
    /// sleeping `base, base*2, base*4, ...` between attempts. Other
    /// 4xx and decode failures surface immediately.
    ///
    /// # Errors
    /// - [`LlmError::RetriesExhausted`] once the attempt cap is spent,
    ///   carrying the last attempt's error
    /// - [`ProviderError::HttpStatus`] for non-retryable statuses
    /// - [`ProviderError::Decode`] / [`ProviderError::EmptyChoices`]
    ///   for unusable response bodies
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        run_with_retry(self.cfg.max_attempts, self.cfg.backoff_base, |attempt| {
            self.try_complete(messages, attempt)
        })
        .await
    }

    /// One attempt: send, classify, decode.
    async fn try_complete(
        &self,
        messages: &[ChatMessage],
        attempt: u32,
    ) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, messages);

        debug!(
            model = %self.cfg.model,
            attempt,
            messages = messages.len(),
            "POST {}", self.url_chat
        );

        let resp = match self.client.post(&self.url_chat).json(&body).send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => return Err(LlmError::Timeout(self.cfg.timeout)),
            Err(e) => return Err(e.into()),
        };

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            warn!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis() as u64,
                "chat completion returned non-success status"
            );

            return Err(ProviderError::HttpStatus {
                status,
                url,
                snippet,
            }
            .into());
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) if e.is_timeout() => return Err(LlmError::Timeout(self.cfg.timeout)),
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "failed to decode chat completion response"
                );
                return Err(ProviderError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                ))
                .into());
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(ProviderError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis() as u64,
            content_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a ModelConfig, messages: &'a [ChatMessage]) -> Self {
        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_base() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(1, base), Duration::from_millis(500));
        assert_eq!(backoff_delay(2, base), Duration::from_millis(1000));
        assert_eq!(backoff_delay(3, base), Duration::from_millis(2000));
        assert_eq!(backoff_delay(4, base), Duration::from_millis(4000));
    }

    #[test]
    fn backoff_does_not_overflow_on_large_attempts() {
        let base = Duration::from_millis(1000);
        // Shift is capped; absurd attempt numbers stay finite.
        let d = backoff_delay(64, base);
        assert!(d >= backoff_delay(17, base));
    }

    #[tokio::test]
    async fn retry_stops_at_attempt_cap_and_wraps_last_error() {
        let calls = std::cell::Cell::new(0u32);
        let result = run_with_retry(3, Duration::from_millis(1), |_attempt| {
            calls.set(calls.get() + 1);
            async { Err(LlmError::Timeout(Duration::from_secs(15))) }
        })
        .await;

        assert_eq!(calls.get(), 3);
        match result {
            Err(LlmError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, LlmError::Timeout(_)));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_retryable_error_fails_on_first_attempt() {
        let calls = std::cell::Cell::new(0u32);
        let result = run_with_retry(3, Duration::from_millis(1), |_attempt| {
            calls.set(calls.get() + 1);
            async {
                Err(ProviderError::HttpStatus {
                    status: reqwest::StatusCode::UNAUTHORIZED,
                    url: "u".into(),
                    snippet: String::new(),
                }
                .into())
            }
        })
        .await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(
            result,
            Err(LlmError::Provider(ProviderError::HttpStatus { .. }))
        ));
    }

    #[tokio::test]
    async fn transient_failure_recovers_on_a_later_attempt() {
        let calls = std::cell::Cell::new(0u32);
        let result = run_with_retry(3, Duration::from_millis(1), |attempt| {
            calls.set(calls.get() + 1);
            async move {
                if attempt < 2 {
                    Err(LlmError::Timeout(Duration::from_secs(15)))
                } else {
                    Ok("recovered".to_string())
                }
            }
        })
        .await;

        assert_eq!(calls.get(), 2);
        assert_eq!(result.unwrap(), "recovered");
    }

    #[test]
    fn request_body_shape() {
        let cfg = ModelConfig {
            model: "m".into(),
            endpoint: "https://openrouter.ai/api".into(),
            api_key: "k".into(),
            temperature: Some(0.0),
            max_tokens: None,
            timeout: Duration::from_secs(15),
            max_attempts: 3,
            backoff_base: Duration::from_millis(500),
        };
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let body = ChatCompletionRequest::from_cfg(&cfg, &messages);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "u");
        assert_eq!(json["temperature"], 0.0);
        assert!(json.get("max_tokens").is_none());
    }
}
