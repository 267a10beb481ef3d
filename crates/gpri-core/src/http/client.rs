//! GitHub REST API client for the issue events feed

use crate::config::StepConfig;
use crate::error::{Error, Result};
use crate::http::feed::{api_error_message, decode_merge_events};
use crate::types::{MergeEvent, RepoSlug, FETCH_LIMIT};
use reqwest::StatusCode;
use std::time::Duration;

const USER_AGENT: &str = concat!("gpri/", env!("CARGO_PKG_VERSION"));

/// GitHub API client authenticated with basic auth
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    token: String,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Runtime(format!("Failed to create HTTP client: {}", e)))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.into(),
            token: token.into(),
        })
    }

    /// Create from validated step configuration
    pub fn from_config(config: &StepConfig<'_>) -> Result<Self> {
        Self::new(
            config.api_url.as_ref(),
            config.github_username.as_ref(),
            config.github_access_token.as_ref(),
            config.timeout(),
        )
    }

    /// Fetch the most recent page of issue events and keep the merge events.
    ///
    /// Endpoint: GET /repos/{owner}/{repo}/issues/events?per_page=30
    ///
    /// Events come back newest first and are not re-sorted. Exactly one
    /// request is made; failures are not retried.
    pub async fn fetch_merge_events(&self, repo: &RepoSlug) -> Result<Vec<MergeEvent>> {
        let url = format!(
            "{}/repos/{}/{}/issues/events",
            self.base_url, repo.owner, repo.name
        );
        tracing::debug!(%url, per_page = FETCH_LIMIT, "fetching issue events");

        let response = self
            .client
            .get(&url)
            .query(&[("per_page", FETCH_LIMIT.to_string())])
            .basic_auth(&self.username, Some(&self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::FORBIDDEN {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            if remaining.as_deref() == Some("0") {
                let reset = response
                    .headers()
                    .get("x-ratelimit-reset")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                return Err(Error::RateLimitExceeded(format!(
                    "GitHub API rate limit exceeded. Remaining: 0. Resets at: {}",
                    reset
                )));
            }
        }

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body = response.bytes().await?;
        tracing::debug!(bytes = body.len(), "received issue events");
        decode_merge_events(&body)
    }
}

/// Build the error for a non-2xx response
fn status_error(status: StatusCode, body: &[u8]) -> Error {
    match api_error_message(body) {
        Some(message) => Error::Api(format!(
            "HTTP error {}; error message: {}",
            status, message
        )),
        None => Error::Api(format!("HTTP error {}", status)),
    }
}
