//! HTTP side of a playback run.

use futures::{StreamExt, stream::BoxStream};
use serde_json::json;

use crate::error::PlaybackError;

/// Client for the solving backend.
pub struct PlaybackClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlaybackClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PlaybackError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Checks the backend is up before committing to a run.
    pub async fn ping(&self) -> Result<(), PlaybackError> {
        let url = format!("{}/ping", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| PlaybackError::Unreachable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PlaybackError::Unreachable(format!(
                "{url} answered {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Opens the streaming solve endpoint for one page.
    ///
    /// Pre-stream rejections (missing HTML, backend misconfiguration)
    /// surface as [`PlaybackError::Server`] with the backend's message.
    pub async fn solve_events(
        &self,
        html: &str,
    ) -> Result<BoxStream<'static, Result<Vec<u8>, PlaybackError>>, PlaybackError> {
        let response = self
            .http
            .post(format!("{}/solve", self.base_url))
            .json(&json!({ "html": html }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("{status}: {body}"));
            return Err(PlaybackError::Server(message));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(PlaybackError::from))
            .boxed())
    }
}
