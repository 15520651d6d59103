//! Subscribe to a bridge topic over WebSocket and print incoming frames.
//!
//! Usage: cargo run --example ws_subscribe -- [topic]

use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let topic = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "uromed/ph".to_string());
    let url = format!("ws://127.0.0.1:8000/ws/{}", topic);

    println!("Connecting to {}", url);
    let (stream, _) = connect_async(&url).await?;
    let (_, mut read) = stream.split();

    while let Some(frame) = read.next().await {
        if let Message::Text(text) = frame? {
            println!("[{}] {}", topic, text);
        }
    }

    println!("Connection closed");
    Ok(())
}
