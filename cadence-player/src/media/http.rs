//! HTTP client for the media node

use super::MediaService;
use crate::error::{Error, Result};
use async_trait::async_trait;
use cadence_common::{SearchResult, SessionId, Track};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Talks to the media node's REST API.
///
/// The node exposes `/search` plus per-session playback endpoints. All
/// failures map to [`Error::Media`]; callers decide whether that is soft
/// or fatal for the transition in progress.
pub struct HttpMediaService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PositionResponse {
    position_ms: u64,
}

impl HttpMediaService {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Media(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let url = self.url(path);
        debug!(%url, "media node request");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Media(format!("request to {} failed: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(Error::Media(format!(
                "media node returned {} for {}",
                response.status(),
                url
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaService for HttpMediaService {
    async fn search(&self, query: &str) -> Result<SearchResult> {
        let url = self.url("/search");
        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| Error::Media(format!("search request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(Error::Media(format!(
                "media node returned {} for search",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| Error::Media(format!("invalid search response: {}", e)))
    }

    async fn play(&self, session_id: SessionId, track: &Track) -> Result<()> {
        self.post_json(
            &format!("/sessions/{}/play", session_id.0),
            &serde_json::json!({ "track": track }),
        )
        .await
    }

    async fn pause(&self, session_id: SessionId, paused: bool) -> Result<()> {
        self.post_json(
            &format!("/sessions/{}/pause", session_id.0),
            &serde_json::json!({ "paused": paused }),
        )
        .await
    }

    async fn stop(&self, session_id: SessionId) -> Result<()> {
        self.post_json(
            &format!("/sessions/{}/stop", session_id.0),
            &serde_json::json!({}),
        )
        .await
    }

    async fn set_volume(&self, session_id: SessionId, volume: u8) -> Result<()> {
        self.post_json(
            &format!("/sessions/{}/volume", session_id.0),
            &serde_json::json!({ "volume": volume }),
        )
        .await
    }

    async fn disconnect(&self, session_id: SessionId) -> Result<()> {
        self.post_json(
            &format!("/sessions/{}/disconnect", session_id.0),
            &serde_json::json!({}),
        )
        .await
    }

    async fn position(&self, session_id: SessionId) -> Result<u64> {
        let url = self.url(&format!("/sessions/{}/position", session_id.0));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Media(format!("position request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(Error::Media(format!(
                "media node returned {} for position",
                response.status()
            )));
        }
        let body: PositionResponse = response
            .json()
            .await
            .map_err(|e| Error::Media(format!("invalid position response: {}", e)))?;
        Ok(body.position_ms)
    }
}
