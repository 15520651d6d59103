//! WebSocket connection lifecycle
//!
//! Each accepted socket is registered with the bridge under the topic named
//! by the request path, given an outbound pump task, and drained until it
//! disconnects. There is no reconnection and no replay: frames fanned out
//! while a connection is down are gone for that connection.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use super::service::BridgeHandle;

/// Run one subscriber connection to completion
pub async fn handle_connection(ws: WebSocket, topic: String, bridge: BridgeHandle) {
    let id = Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = ws.split();

    // Channel the bridge delivers into; the pump forwards frames to the socket
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    bridge.register(&topic, id, tx);
    info!("subscriber {} connected on '{}'", id, topic);

    let pump_topic = topic.clone();
    tokio::task::spawn(async move {
        let mut frames = UnboundedReceiverStream::new(rx);
        while let Some(text) = frames.next().await {
            if let Err(e) = ws_tx.send(Message::text(text)).await {
                debug!("send to subscriber on '{}' failed: {}", pump_topic, e);
                break;
            }
        }
        // Dropping the receiver closes the channel, which marks this
        // subscriber unreachable for the next broadcast touching it
    });

    // Inbound frames only signal liveness; their payloads are not used
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(frame) => debug!("inbound frame on '{}': {:?}", topic, frame),
            Err(e) => {
                debug!("receive on '{}' failed: {}", topic, e);
                break;
            }
        }
    }

    bridge.unregister(&topic, id);
    info!("subscriber {} disconnected from '{}'", id, topic);
}
