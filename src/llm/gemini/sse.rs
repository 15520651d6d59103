//! Server-Sent Events (SSE) parser for Gemini responses

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::GenerateContentResponse;

/// Parse a stream of bytes as Gemini SSE events
///
/// Gemini's SSE format uses `data: <json>` lines. This parser:
/// 1. Reads lines from the byte stream
/// 2. Filters for lines starting with "data: "
/// 3. Extracts and parses the JSON payload
/// 4. Returns a stream of parsed responses
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, LlmError>> + Send>> {
    // Buffer to accumulate partial lines
    let mut buffer = String::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        // Convert bytes to string and append to buffer
        let text = match std::str::from_utf8(&chunk) {
            Ok(t) => t,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                )))]);
            }
        };

        buffer.push_str(text);

        // Process complete lines
        let mut events = Vec::new();
        while let Some(newline_pos) = buffer.find('\n') {
            let line = buffer[..newline_pos].trim().to_string();
            buffer.drain(..=newline_pos);

            // Skip empty lines
            if line.is_empty() {
                continue;
            }

            // Process data lines
            if let Some(data) = line.strip_prefix("data: ") {
                // Parse the JSON payload
                match serde_json::from_str::<GenerateContentResponse>(data) {
                    Ok(response) => events.push(Ok(response)),
                    Err(e) => {
                        events.push(Err(LlmError::SerializationError(format!(
                            "Failed to parse SSE data: {}. Data: {}",
                            e, data
                        ))));
                    }
                }
            }
            // Ignore other line types (event:, id:, etc.)
        }

        // Return all events found in this chunk
        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}
