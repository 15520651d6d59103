// GET /stream/{session_id} chat streaming endpoint

use std::convert::Infallible;
use std::sync::Arc;

use async_stream::stream;
use futures::{Stream, StreamExt};
use pin_utils::pin_mut;
use tracing::{error, info};
use warp::sse::Event;

use crate::chat::memory::{build_chat_prompt, render_transcript};
use crate::chat::{ChatRole, ChatStore, SessionRegistry, WindowMemory};
use crate::llm::{GenerateRequest, LlmProvider, Message, StreamEvent};
use crate::sse::{chunk_event, done_event, inactive_event};

// Used when a session was started without pending input.
const DEFAULT_GREETING: &str = "Hello, who are you?";

pub async fn chat_stream_handler(
    session_id: String,
    sessions: SessionRegistry,
    store: ChatStore,
    provider: Arc<dyn LlmProvider>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let events = chat_events(session_id, sessions, store, provider);
    Ok(warp::sse::reply(warp::sse::keep_alive().stream(events)))
}

// Streams one model reply for the session's pending input.
//
// Frames are JSON-encoded text chunks, terminated by a single "[DONE]"
// frame. Inactive sessions get exactly one "Session not active" frame.
fn chat_events(
    session_id: String,
    sessions: SessionRegistry,
    store: ChatStore,
    provider: Arc<dyn LlmProvider>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream! {
        let state = match sessions.get(&session_id).await {
            Some(state) if state.active => state,
            _ => {
                info!("Stream requested for inactive session {}", session_id);
                yield inactive_event();
                return;
            }
        };

        let user_input = state
            .last_chat
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());

        // Persist the user turn first so the loaded window includes it.
        if let Err(e) = store.append(&session_id, ChatRole::Human, &user_input).await {
            error!("Failed to persist user message: {}", e);
            yield done_event();
            return;
        }

        let window = WindowMemory::default();
        let history = match window.load(&store, &session_id).await {
            Ok(messages) => messages,
            Err(e) => {
                error!("Failed to load history for session {}: {}", session_id, e);
                yield done_event();
                return;
            }
        };

        let transcript = render_transcript(&history);
        let prompt = build_chat_prompt(&transcript, &user_input);

        let request = GenerateRequest::new(vec![Message::user(prompt)]);
        let llm_stream = match provider.stream_generate(request).await {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to start generation stream: {}", e);
                yield done_event();
                return;
            }
        };

        pin_mut!(llm_stream);

        info!("Streaming reply for session {}", session_id);
        let mut reply = String::new();
        while let Some(event) = llm_stream.next().await {
            match event {
                Ok(StreamEvent::TextDelta { text }) => {
                    reply.push_str(&text);
                    yield chunk_event(&text);
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Generation stream error: {}", e);
                    break;
                }
            }
        }

        if !reply.is_empty() {
            if let Err(e) = store.append(&session_id, ChatRole::Ai, &reply).await {
                error!("Failed to persist model reply: {}", e);
            }
        }

        yield done_event();
    }
}
