//! Gemini client implementation

use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use reqwest::Client;
use std::pin::Pin;
use std::time::Duration;
use uuid::Uuid;

use crate::llm::core::{
    error::LlmError,
    provider::LlmProvider,
    types::{GenerateReply, GenerateRequest, StreamEvent},
};

use super::mapper::{
    create_message_start, from_gemini_response, reply_from_response, to_gemini_request,
};
use super::sse::parse_sse_stream;

/// Base URL of the Generative Language API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini model identifiers
#[derive(Debug, Clone)]
pub enum GeminiModel {
    /// Gemini 2.0 Flash
    Gemini20Flash,
    /// Gemini 2.5 Flash
    Gemini25Flash,
    /// Gemini 2.5 Pro
    Gemini25Pro,
}

impl GeminiModel {
    /// Get the model identifier string
    pub fn as_str(&self) -> &str {
        match self {
            GeminiModel::Gemini20Flash => "gemini-2.0-flash",
            GeminiModel::Gemini25Flash => "gemini-2.5-flash",
            GeminiModel::Gemini25Pro => "gemini-2.5-pro",
        }
    }
}

/// Client for the Gemini models on the Generative Language API
///
/// Authenticates with an API key sent in the `x-goog-api-key` header.
pub struct GeminiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key for the Generative Language API
    api_key: String,
    /// Model to use
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Arguments
    ///
    /// * `api_key` - Generative Language API key
    /// * `model` - Gemini model to use
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: String, model: GeminiModel) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            model,
        })
    }

    /// Build the endpoint URL for a single-shot generation
    fn build_generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            API_BASE_URL,
            self.model.as_str()
        )
    }

    /// Build the endpoint URL for streaming
    fn build_stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            API_BASE_URL,
            self.model.as_str()
        )
    }

    /// Make a single-shot request to Gemini
    async fn make_request(&self, request: GenerateRequest) -> Result<GenerateReply, LlmError> {
        let gemini_request = to_gemini_request(request);

        let url = self.build_generate_url();
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let gemini_response = response.json().await?;
        reply_from_response(gemini_response)
    }

    /// Make a streaming request to Gemini
    async fn make_streaming_request(
        &self,
        request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>, LlmError> {
        // Convert to Gemini request format
        let gemini_request = to_gemini_request(request);

        // Build request
        let url = self.build_stream_url();
        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        // Parse SSE stream
        let byte_stream = response.bytes_stream();
        let sse_stream = parse_sse_stream(Box::pin(byte_stream));

        // Convert to StreamEvent stream
        let message_id = Uuid::new_v4().to_string();
        let mut emitted_start = false;

        let event_stream = sse_stream.map(move |result| match result {
            Ok(gemini_response) => {
                let mut events = Vec::new();

                // Emit message start on first chunk
                if !emitted_start {
                    events.push(create_message_start(message_id.clone()));
                    emitted_start = true;
                }

                // Convert Gemini response to our events
                events.extend(from_gemini_response(gemini_response));

                Ok(events)
            }
            Err(e) => Err(e),
        });

        // Flatten the stream of event vectors into individual events
        let flattened = event_stream.flat_map(|result| {
            futures::stream::iter(match result {
                Ok(events) => events.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
        });

        Ok(Box::pin(flattened))
    }
}

/// Map a non-success response to an error, with 429 handled specially
async fn response_error(response: reqwest::Response) -> LlmError {
    let status = response.status();
    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .map(Duration::from_secs);
        return LlmError::RateLimitExceeded { retry_after };
    }

    let body = response.text().await.unwrap_or_else(|_| String::new());
    LlmError::HttpError {
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateReply, LlmError> {
        self.make_request(request).await
    }

    async fn stream_generate(
        &self,
        request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>, LlmError> {
        self.make_streaming_request(request).await
    }
}
