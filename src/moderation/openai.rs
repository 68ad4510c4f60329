// OpenAI moderation endpoint implementation.
//
// Posts one comment body per request and reads `category_scores` from the
// first result. Calls are paced by a RateLimiter; there are no retries.
//
// API docs: https://platform.openai.com/docs/api-reference/moderations

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{CategoryScores, Classifier};
use crate::error::ClassificationError;
use crate::output::log_preview;
use crate::rate_limiter::{RateLimiter, MODERATION_DELAY};

/// Longest input sent to the endpoint, in characters.
pub const MAX_INPUT_CHARS: usize = 7000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI moderation classifier.
pub struct OpenAiModerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    rate_limiter: RateLimiter,
}

impl OpenAiModerator {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Result<Self, ClassificationError> {
        Self::with_call_delay(endpoint, api_key, model, MODERATION_DELAY)
    }

    /// Same as `new`, with a custom gap between moderation calls.
    pub fn with_call_delay(
        endpoint: &str,
        api_key: &str,
        model: &str,
        call_delay: Duration,
    ) -> Result<Self, ClassificationError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClassificationError::Request)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            rate_limiter: RateLimiter::new(call_delay),
        })
    }
}

#[async_trait]
impl Classifier for OpenAiModerator {
    async fn classify(&self, text: &str) -> Result<CategoryScores, ClassificationError> {
        self.rate_limiter.acquire().await;

        let request = ModerationRequest {
            input: clip_input(text),
            model: &self.model,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ClassificationError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(ClassificationError::Request)?;

        if !status.is_success() {
            return Err(ClassificationError::Status { status, body });
        }

        let parsed: ModerationResponse = serde_json::from_str(&body)
            .map_err(|e| ClassificationError::Payload(e.to_string()))?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ClassificationError::Payload("empty results array".to_string()))?;

        // Some categories come back as null for inputs they don't apply to.
        let scores: CategoryScores = result
            .category_scores
            .into_iter()
            .filter_map(|(category, score)| score.map(|s| (category, s)))
            .collect();

        debug!(
            categories = scores.len(),
            provider_flagged = result.flagged,
            text_preview = %log_preview(text, 50),
            "Classified text"
        );

        Ok(scores)
    }
}

/// Cut text to `MAX_INPUT_CHARS` characters without splitting a code point.
fn clip_input(text: &str) -> String {
    text.chars().take(MAX_INPUT_CHARS).collect()
}

// --- Moderation API request/response types ---

#[derive(Serialize)]
struct ModerationRequest<'a> {
    input: String,
    model: &'a str,
}

#[derive(Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResultBody>,
}

#[derive(Deserialize)]
struct ModerationResultBody {
    #[serde(default)]
    flagged: bool,
    category_scores: HashMap<String, Option<f64>>,
}
