// Route definitions and wiring

use std::convert::Infallible;
use std::sync::Arc;

use warp::Filter;

use crate::bridge::{self, BridgeHandle};
use crate::chat::{ChatStore, SessionRegistry};
use crate::handlers;
use crate::llm::LlmProvider;

/// Provider handle shared across request handlers
pub type SharedProvider = Arc<dyn LlmProvider>;

/// Build the full route tree
pub fn configure_routes(
    provider: SharedProvider,
    store: ChatStore,
    sessions: SessionRegistry,
    bridge: BridgeHandle,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // GET /
    let health = warp::path::end()
        .and(warp::get())
        .and_then(handlers::health_handler);

    let analysis = warp::path("analysis");

    // GET /analysis/ph
    let ph = analysis
        .and(warp::path("ph"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::ph_handler);

    // GET /analysis/color
    let color = analysis
        .and(warp::path("color"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::color_handler);

    // GET /analysis/mass
    let mass = analysis
        .and(warp::path("mass"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::mass_handler);

    // GET /analysis/velocity
    let velocity = analysis
        .and(warp::path("velocity"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::velocity_handler);

    // POST /analysis/ai
    let analysis_ai = analysis
        .and(warp::path("ai"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_provider(provider.clone()))
        .and_then(handlers::analysis_ai_handler);

    // POST /start
    let start = warp::path("start")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_sessions(sessions.clone()))
        .and_then(handlers::start_session_handler);

    // GET /chat/{session_id}
    let get_chat = warp::path("chat")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::get_chat_handler);

    // DELETE /chat/{session_id}
    let delete_chat = warp::path("chat")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(with_store(store.clone()))
        .and_then(handlers::delete_chat_handler);

    // GET /stream/{session_id}
    let stream = warp::path("stream")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_sessions(sessions))
        .and(with_store(store))
        .and(with_provider(provider))
        .and_then(handlers::chat_stream_handler);

    // GET /ws/{topic...} - the remainder of the path is the topic
    let ws = warp::path("ws")
        .and(warp::path::tail())
        .and(warp::ws())
        .and(with_bridge(bridge))
        .map(
            |tail: warp::path::Tail, ws: warp::ws::Ws, bridge: BridgeHandle| {
                let topic = tail.as_str().to_string();
                ws.on_upgrade(move |socket| bridge::handle_connection(socket, topic, bridge))
            },
        );

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "DELETE"]);

    health
        .or(ph)
        .or(color)
        .or(mass)
        .or(velocity)
        .or(analysis_ai)
        .or(start)
        .or(get_chat)
        .or(delete_chat)
        .or(stream)
        .or(ws)
        .with(cors)
}

fn with_provider(
    provider: SharedProvider,
) -> impl Filter<Extract = (SharedProvider,), Error = Infallible> + Clone {
    warp::any().map(move || provider.clone())
}

fn with_store(store: ChatStore) -> impl Filter<Extract = (ChatStore,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn with_sessions(
    sessions: SessionRegistry,
) -> impl Filter<Extract = (SessionRegistry,), Error = Infallible> + Clone {
    warp::any().map(move || sessions.clone())
}

fn with_bridge(
    bridge: BridgeHandle,
) -> impl Filter<Extract = (BridgeHandle,), Error = Infallible> + Clone {
    warp::any().map(move || bridge.clone())
}
