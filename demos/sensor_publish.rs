//! Publish fake pH readings to an MQTT broker, for driving the bridge locally.
//!
//! Usage: cargo run --example sensor_publish -- [host] [port]

use std::time::Duration;

use rumqttc::{AsyncClient, MqttOptions, QoS};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = std::env::args()
        .nth(2)
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(1883);

    let mut options = MqttOptions::new("uromed-demo-sensor", host, port);
    options.set_keep_alive(Duration::from_secs(30));
    let (client, mut event_loop) = AsyncClient::new(options, 16);

    tokio::spawn(async move {
        loop {
            if let Err(e) = event_loop.poll().await {
                eprintln!("mqtt error: {}", e);
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    });

    let mut n = 0u32;
    loop {
        let ph = 5.5 + f64::from(n % 30) / 10.0;
        client
            .publish("uromed/ph", QoS::AtMostOnce, false, format!("{:.1}", ph))
            .await?;
        println!("published uromed/ph {:.1}", ph);
        n += 1;
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}
