// Vanilla forum API client: bearer-authenticated JSON GET over HTTP.
//
// A thin reqwest wrapper with one generic GET helper. Requests are paced
// by a RateLimiter so paging through the comment feed stays polite.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FetchError;
use crate::rate_limiter::{RateLimiter, PAGE_DELAY};

const USER_AGENT: &str = concat!("forum-watch/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the forum's v2 REST API.
pub struct ForumClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    rate_limiter: RateLimiter,
}

impl ForumClient {
    /// Create a client for the forum at `base_url` using a bearer `token`.
    pub fn new(base_url: &str, token: &str) -> Result<Self, FetchError> {
        Self::with_page_delay(base_url, token, PAGE_DELAY)
    }

    /// Same as `new`, with a custom gap between page requests.
    pub fn with_page_delay(
        base_url: &str,
        token: &str,
        page_delay: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            rate_limiter: RateLimiter::new(page_delay),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `endpoint` with query `params` and deserialize the JSON body.
    ///
    /// `page` is only used to label errors and logs.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        page: u32,
    ) -> Result<T, FetchError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, page, "Forum GET request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|source| FetchError::Request { page, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request { page, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { page, status, body });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Payload {
            page,
            reason: e.to_string(),
        })
    }
}
