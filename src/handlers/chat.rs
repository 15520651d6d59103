// Chat session endpoints

use tracing::{debug, error, info};
use warp::http::StatusCode;

use crate::chat::{ChatStore, SessionRegistry};
use crate::models::{HistoryEntry, HistoryReply, MessageReply, SessionRequest};

// POST /start
//
// Registers (or refreshes) a session and stashes the pending user input
// for the next call to the stream endpoint.
pub async fn start_session_handler(
    request: SessionRequest,
    sessions: SessionRegistry,
) -> Result<impl warp::Reply, warp::Rejection> {
    info!("Starting session {}", request.session_id);
    sessions.start(&request.session_id, request.last_chat).await;
    Ok(warp::reply::json(&MessageReply {
        message: format!("Session {} started.", request.session_id),
    }))
}

// GET /chat/{session_id}
pub async fn get_chat_handler(
    session_id: String,
    store: ChatStore,
) -> Result<impl warp::Reply, warp::Rejection> {
    match store.history(&session_id).await {
        Ok(messages) => {
            let history = messages
                .into_iter()
                .map(|message| HistoryEntry {
                    role: message.role,
                    content: message.content,
                })
                .collect();
            Ok(warp::reply::with_status(
                warp::reply::json(&HistoryReply {
                    session_id,
                    history,
                }),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            error!("Failed to load history for session {}: {}", session_id, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"error": "failed to load history"})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

// DELETE /chat/{session_id}
pub async fn delete_chat_handler(
    session_id: String,
    store: ChatStore,
) -> Result<impl warp::Reply, warp::Rejection> {
    match store.clear(&session_id).await {
        Ok(deleted) => {
            debug!("Deleted {} messages for session {}", deleted, session_id);
            Ok(warp::reply::with_status(
                warp::reply::json(&MessageReply {
                    message: format!("History for session {} deleted.", session_id),
                }),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            error!("Failed to clear history for session {}: {}", session_id, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({"error": "failed to delete history"})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
