//! Mapping between abstraction types and Gemini types

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    types::{
        FinishReason, GenerateReply, GenerateRequest, Message, MessageMetadata, MessageRole,
        StreamEvent, UsageMetadata,
    },
};

use super::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse, Part,
    SystemInstruction,
};

/// Convert our abstraction request to Gemini's request format
///
/// When the request carries a response schema, the schema is embedded in the
/// system instruction and the response MIME type is forced to JSON so the
/// model replies with a conforming object.
pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    let json_output = request.response_schema.is_some();

    let system_text = match (request.system, request.response_schema) {
        (Some(system), Some(schema)) => Some(format!(
            "{}\n\n{}",
            system,
            build_schema_instruction(&schema)
        )),
        (Some(system), None) => Some(system),
        (None, Some(schema)) => Some(build_schema_instruction(&schema)),
        (None, None) => None,
    };

    GenerateContentRequest {
        contents: request.messages.into_iter().map(to_gemini_content).collect(),
        system_instruction: system_text.map(|text| SystemInstruction {
            parts: vec![Part { text }],
        }),
        generation_config: Some(to_gemini_generation_config(request.config, json_output)),
    }
}

/// Convert a message to Gemini's content format
fn to_gemini_content(message: Message) -> Content {
    let role = match message.role {
        MessageRole::User => "user".to_string(),
        MessageRole::Assistant => "model".to_string(),
    };

    Content {
        role,
        parts: vec![Part { text: message.text }],
    }
}

/// Convert generation config to Gemini's format
fn to_gemini_generation_config(config: GenerationConfig, json_output: bool) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        max_output_tokens: Some(config.max_tokens),
        temperature: config.temperature,
        top_p: config.top_p,
        top_k: config.top_k,
        stop_sequences: config.stop_sequences,
        response_mime_type: json_output.then(|| "application/json".to_string()),
    }
}

/// Build the instruction that constrains the reply to a JSON schema
fn build_schema_instruction(schema: &serde_json::Value) -> String {
    format!(
        "Respond only with a JSON object that conforms to the following JSON schema:\n\n{}\n\nReturn an instance of the schema, not the schema itself.",
        schema
    )
}

/// Convert a Gemini response chunk to our abstraction's stream events
pub fn from_gemini_response(response: GenerateContentResponse) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    let Some(candidate) = response.candidates.first() else {
        return events;
    };

    for part in &candidate.content.parts {
        // Empty-part candidates occur at limits like MAX_TOKENS
        if !part.text.is_empty() {
            events.push(StreamEvent::TextDelta {
                text: part.text.clone(),
            });
        }
    }

    if let Some(finish_reason_str) = &candidate.finish_reason {
        let usage = response
            .usage_metadata
            .as_ref()
            .map(from_gemini_usage)
            .unwrap_or_else(|| UsageMetadata::new(0, 0));
        events.push(StreamEvent::MessageEnd {
            finish_reason: map_finish_reason(finish_reason_str),
            usage,
        });
    }

    events
}

/// Convert a complete Gemini response to a reply
///
/// Concatenates the text parts of the first candidate. A response with no
/// candidates at all (e.g. a blocked prompt) is an error.
pub fn reply_from_response(response: GenerateContentResponse) -> Result<GenerateReply, LlmError> {
    let candidate = response.candidates.first().ok_or_else(|| {
        LlmError::EmptyResponse("response contained no candidates".to_string())
    })?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|part| part.text.as_str())
        .collect();

    let finish_reason = candidate
        .finish_reason
        .as_deref()
        .map(map_finish_reason)
        .unwrap_or(FinishReason::Stop);

    Ok(GenerateReply {
        text,
        finish_reason,
        usage: response.usage_metadata.as_ref().map(from_gemini_usage),
    })
}

/// Map Gemini's finish reason to our abstraction
fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        "RECITATION" => FinishReason::Recitation,
        other => FinishReason::Other(other.to_string()),
    }
}

fn from_gemini_usage(usage: &super::types::UsageMetadata) -> UsageMetadata {
    UsageMetadata {
        input_tokens: usage.prompt_token_count,
        output_tokens: usage.candidates_token_count,
        total_tokens: usage.total_token_count,
    }
}

/// Helper to create initial message start event
pub fn create_message_start(message_id: String) -> StreamEvent {
    StreamEvent::MessageStart {
        message: MessageMetadata {
            id: message_id,
            role: MessageRole::Assistant,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gemini::types::Candidate;

    #[test]
    fn test_to_gemini_content_user() {
        let message = Message::user("Hello");
        let content = to_gemini_content(message);
        assert_eq!(content.role, "user");
        assert_eq!(content.parts.len(), 1);
        assert_eq!(content.parts[0].text, "Hello");
    }

    #[test]
    fn test_to_gemini_content_assistant() {
        let message = Message::assistant("Hi there");
        let content = to_gemini_content(message);
        assert_eq!(content.role, "model");
    }

    #[test]
    fn test_to_gemini_generation_config() {
        let config = GenerationConfig::new(2048)
            .with_temperature(0.7)
            .with_top_k(40);
        let gemini_config = to_gemini_generation_config(config, false);
        assert_eq!(gemini_config.max_output_tokens, Some(2048));
        assert_eq!(gemini_config.temperature, Some(0.7));
        assert_eq!(gemini_config.top_k, Some(40));
        assert_eq!(gemini_config.response_mime_type, None);
    }

    #[test]
    fn test_to_gemini_request_with_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "analysis": {"type": "string"}
            }
        });
        let request = GenerateRequest::new(vec![Message::user("Analyze this")])
            .with_system("You are a lab assistant")
            .with_response_schema(schema);

        let gemini_request = to_gemini_request(request);
        let system = gemini_request.system_instruction.unwrap();
        assert!(system.parts[0].text.starts_with("You are a lab assistant"));
        assert!(system.parts[0].text.contains("\"analysis\""));
        assert_eq!(
            gemini_request
                .generation_config
                .unwrap()
                .response_mime_type
                .as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_to_gemini_request_schema_without_system() {
        let request = GenerateRequest::new(vec![Message::user("Analyze this")])
            .with_response_schema(serde_json::json!({"type": "object"}));

        let gemini_request = to_gemini_request(request);
        let system = gemini_request.system_instruction.unwrap();
        assert!(system.parts[0].text.contains("JSON schema"));
    }

    #[test]
    fn test_map_finish_reason() {
        assert_eq!(map_finish_reason("STOP"), FinishReason::Stop);
        assert_eq!(map_finish_reason("MAX_TOKENS"), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason("SAFETY"), FinishReason::Safety);
        assert_eq!(map_finish_reason("RECITATION"), FinishReason::Recitation);
        assert_eq!(
            map_finish_reason("UNKNOWN"),
            FinishReason::Other("UNKNOWN".to_string())
        );
    }

    #[test]
    fn test_from_gemini_response_text() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts: vec![Part {
                        text: "Hello!".to_string(),
                    }],
                },
                finish_reason: None,
                safety_ratings: None,
            }],
            usage_metadata: None,
        };

        let events = from_gemini_response(response);
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::TextDelta { text } => assert_eq!(text, "Hello!"),
            _ => panic!("Expected text delta"),
        }
    }

    #[test]
    fn test_from_gemini_response_with_finish() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts: vec![Part {
                        text: "Done".to_string(),
                    }],
                },
                finish_reason: Some("STOP".to_string()),
                safety_ratings: None,
            }],
            usage_metadata: Some(super::super::types::UsageMetadata {
                prompt_token_count: 10,
                candidates_token_count: 5,
                total_token_count: 15,
            }),
        };

        let events = from_gemini_response(response);
        assert_eq!(events.len(), 2); // Delta + MessageEnd
        match &events[1] {
            StreamEvent::MessageEnd {
                finish_reason,
                usage,
            } => {
                assert_eq!(*finish_reason, FinishReason::Stop);
                assert_eq!(usage.total_tokens, 15);
            }
            _ => panic!("Expected message end"),
        }
    }

    #[test]
    fn test_from_gemini_response_skips_empty_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts: vec![Part {
                        text: String::new(),
                    }],
                },
                finish_reason: Some("MAX_TOKENS".to_string()),
                safety_ratings: None,
            }],
            usage_metadata: None,
        };

        let events = from_gemini_response(response);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            StreamEvent::MessageEnd {
                finish_reason: FinishReason::MaxTokens,
                ..
            }
        ));
    }

    #[test]
    fn test_reply_from_response() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts: vec![
                        Part {
                            text: "Hello ".to_string(),
                        },
                        Part {
                            text: "world".to_string(),
                        },
                    ],
                },
                finish_reason: Some("STOP".to_string()),
                safety_ratings: None,
            }],
            usage_metadata: None,
        };

        let reply = reply_from_response(response).unwrap();
        assert_eq!(reply.text, "Hello world");
        assert_eq!(reply.finish_reason, FinishReason::Stop);
        assert!(reply.usage.is_none());
    }

    #[test]
    fn test_reply_from_response_no_candidates() {
        let response = GenerateContentResponse {
            candidates: vec![],
            usage_metadata: None,
        };

        let result = reply_from_response(response);
        assert!(matches!(result, Err(LlmError::EmptyResponse(_))));
    }
}
