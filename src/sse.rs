// Server-sent event construction for the chat stream

use std::convert::Infallible;

use warp::sse::Event;

// Wire format: every chunk is a JSON-encoded string so that clients can
// decode newlines and quotes inside the model text.
pub fn chunk_event(text: &str) -> Result<Event, Infallible> {
    Ok(Event::default().data(serde_json::json!(text).to_string()))
}

// Stream terminator, always the last frame of a reply.
pub fn done_event() -> Result<Event, Infallible> {
    Ok(Event::default().data(serde_json::json!("[DONE]").to_string()))
}

// Sent as the only frame when the session was never started.
pub fn inactive_event() -> Result<Event, Infallible> {
    Ok(Event::default().data("Session not active"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_event_construction() {
        let event = chunk_event("Halo!");
        assert!(event.is_ok());
    }

    #[test]
    fn test_chunk_payload_is_json_encoded() {
        let payload = serde_json::json!("line one\nline two").to_string();
        assert_eq!(payload, r#""line one\nline two""#);
    }

    #[test]
    fn test_done_payload_format() {
        let payload = serde_json::json!("[DONE]").to_string();
        assert_eq!(payload, r#""[DONE]""#);
    }

    #[test]
    fn test_done_event_construction() {
        assert!(done_event().is_ok());
    }

    #[test]
    fn test_inactive_event_construction() {
        assert!(inactive_event().is_ok());
    }
}
