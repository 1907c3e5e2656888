//! HTTP client for the playlist generation service.

use crate::config::{API_BASE_URL, GENERATE_PATH, PLAYLIST_PATH};
use crate::{Playlist, PlaylistRequest, RequestError};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(#[from] RequestError),
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Remote operations the UI needs. Implemented by [`ApiClient`]; mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait PlaylistApi {
    async fn generate_playlist(&self, request: &PlaylistRequest) -> Result<Playlist, ApiError>;

    /// `Ok(None)` when the service has no playlist with this id.
    async fn fetch_playlist(&self, id: &str) -> Result<Option<Playlist>, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: crate::config::normalize_base_url(&base_url.into()),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_url(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_PATH)
    }

    pub fn playlist_url(&self, id: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            PLAYLIST_PATH,
            urlencoding::encode(id)
        )
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        ApiClient::new(API_BASE_URL.as_str())
    }
}

#[async_trait(?Send)]
impl PlaylistApi for ApiClient {
    async fn generate_playlist(&self, request: &PlaylistRequest) -> Result<Playlist, ApiError> {
        let url = self.generate_url();
        debug!(
            "Requesting playlist: activity={:?} duration={} vibe={}",
            request.activity, request.duration, request.vibe
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation failed ({}) at {}", status, url);
            return Err(status_error(status, &body));
        }

        let playlist: Playlist = response.json().await?;
        if playlist.id.trim().is_empty() {
            return Err(ApiError::InvalidResponse(
                "generated playlist has no id".to_string(),
            ));
        }
        info!(
            "Generated playlist {} with {} tracks",
            playlist.id,
            playlist.track_count()
        );
        Ok(playlist)
    }

    async fn fetch_playlist(&self, id: &str) -> Result<Option<Playlist>, ApiError> {
        let url = self.playlist_url(id);
        debug!("Fetching playlist {} from {}", id, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("Playlist {} not found on server", id);
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Lookup of {} failed ({})", id, status);
            return Err(status_error(status, &body));
        }

        Ok(Some(response.json().await?))
    }
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
    ApiError::Status {
        status: status.as_u16(),
        message: error_message(status, body),
    }
}

/// Human-readable message for a failed response: the body's `message`,
/// a FastAPI `detail` (string or validation list), or the status line.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = non_empty_str(json.get("message")) {
            return message.to_string();
        }
        match json.get("detail") {
            Some(Value::String(detail)) if !detail.trim().is_empty() => {
                return detail.clone();
            }
            Some(Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| non_empty_str(item.get("msg")))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }

    match status.canonical_reason() {
        Some(reason) => format!("HTTP Error: {} {}", status.as_u16(), reason),
        None => format!("HTTP Error: {}", status.as_u16()),
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}
