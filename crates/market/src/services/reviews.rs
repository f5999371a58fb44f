//! AI review assistant.
//!
//! A thin client for the Anthropic Messages API that drafts a review from
//! three short answers about the purchase. Purely advisory: nothing in the
//! transactional core depends on it, and the server runs fine without it
//! when no API key is configured.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AnthropicConfig;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

const SYSTEM_PROMPT: &str = "You help marketplace buyers draft a short, honest \
product review from their notes. Write in the first person, two to four \
sentences, no headings, no emoji.";

/// Buyer's answers used to draft the review.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewPrompt {
    /// How the product quality was.
    pub product_quality: String,
    /// How fast delivery was.
    pub delivery_speed: String,
    /// How engaged/communicative the artisan was.
    pub artisan_engagement: String,
}

/// Review assistant errors.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    /// API returned no usable text.
    #[error("empty response from model")]
    EmptyResponse,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: &'static str,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Anthropic-backed review assistant.
#[derive(Clone)]
pub struct ReviewAssistant {
    inner: Arc<ReviewAssistantInner>,
}

struct ReviewAssistantInner {
    client: reqwest::Client,
    model: String,
}

impl ReviewAssistant {
    /// Create a new review assistant.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AnthropicConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(ReviewAssistantInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Draft a review suggestion from the buyer's answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns no text.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model))]
    pub async fn suggest(&self, prompt: &ReviewPrompt) -> Result<String, ReviewError> {
        let request = MessagesRequest {
            model: self.inner.model.clone(),
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: format!(
                    "Product quality: {}\nDelivery speed: {}\nArtisan engagement: {}",
                    prompt.product_quality, prompt.delivery_speed, prompt.artisan_engagement
                ),
            }],
        };

        let response = self
            .inner
            .client
            .post(ANTHROPIC_API_URL)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ReviewError::Api { status, message });
        }

        let body: MessagesResponse = response.json().await?;
        let suggestion = body
            .content
            .into_iter()
            .find(|block| block.kind == "text" && !block.text.is_empty())
            .map(|block| block.text)
            .ok_or(ReviewError::EmptyResponse)?;

        Ok(suggestion)
    }
}
