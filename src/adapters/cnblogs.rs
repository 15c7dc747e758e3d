//! cnblogs editor API adapter.
//!
//! Endpoints (relative to the API base, `https://i.cnblogs.com` by default):
//! - `GET  /api/posts/{id}`: fetch one post
//! - `POST /api/posts`: create, or update when the payload carries an `id`
//!
//! Auth: the browser session cookie plus its XSRF token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use tracing::debug;

use super::{ApiError, BlogApi};
use crate::config::{ApiSettings, Credentials, ResolvedConfig};
use crate::domain::{PostPayload, PublishedPost, RemotePost};

/// User agent the editor API expects
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Statuses accepted as a successful save
const SAVE_SUCCESS: [StatusCode; 2] = [StatusCode::OK, StatusCode::CREATED];

/// cnblogs API client
pub struct CnblogsClient {
    /// API base URL without trailing slash
    base_url: String,
    /// Session credentials sent with every request
    credentials: Credentials,
    /// Timeout for `GET /api/posts/{id}`
    fetch_timeout: Duration,
    /// Timeout for `POST /api/posts`
    save_timeout: Duration,
    /// HTTP client
    client: reqwest::Client,
}

impl CnblogsClient {
    /// Create a client with default timeouts
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self, ApiError> {
        let defaults = ApiSettings::default();
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            fetch_timeout: Duration::from_secs(defaults.fetch_timeout_seconds),
            save_timeout: Duration::from_secs(defaults.publish_timeout_seconds),
            client,
        })
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ApiError> {
        Ok(Self::new(config.api.base_url.clone(), config.credentials.clone())?.with_timeouts(
            Duration::from_secs(config.api.fetch_timeout_seconds),
            Duration::from_secs(config.api.publish_timeout_seconds),
        ))
    }

    /// Override the request timeouts
    pub fn with_timeouts(mut self, fetch_timeout: Duration, save_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self.save_timeout = save_timeout;
        self
    }

    /// Build API URL
    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Attach the session credentials
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Cookie", self.credentials.cookie())
            .header("X-XSRF-TOKEN", self.credentials.xsrf_token())
    }
}

#[async_trait]
impl BlogApi for CnblogsClient {
    fn name(&self) -> &str {
        "cnblogs"
    }

    async fn fetch_post(&self, post_id: u64) -> Result<RemotePost, ApiError> {
        let url = self.api_url(&format!("posts/{}", post_id));
        debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .timeout(self.fetch_timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn save_post(&self, payload: &PostPayload) -> Result<PublishedPost, ApiError> {
        let url = self.api_url("posts");
        debug!(
            "POST {} ({})",
            url,
            if payload.is_update() { "update" } else { "create" }
        );

        let response = self
            .authorized(self.client.post(&url))
            .header("Accept", "application/json, text/plain, */*")
            .header("Origin", self.base_url.as_str())
            .header("Referer", format!("{}/posts/edit", self.base_url))
            .json(payload)
            .timeout(self.save_timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !SAVE_SUCCESS.contains(&status) {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let client = CnblogsClient::new(
            "https://i.cnblogs.com/",
            Credentials::new("cookie", "token"),
        )
        .unwrap();
        assert_eq!(client.api_url("posts/42"), "https://i.cnblogs.com/api/posts/42");
        assert_eq!(client.name(), "cnblogs");
    }
}
