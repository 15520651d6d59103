//! MQTT ingress adapter
//!
//! Runs the MQTT event loop on its own task and forwards every inbound
//! publish to the bridge as a command. The adapter never touches the topic
//! registry itself; the bridge handle is its only way in.

use std::path::PathBuf;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::bridge::BridgeHandle;

/// Delay before re-polling the event loop after a connection error
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Broker keep-alive interval
const KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Errors raised while setting up the MQTT connection
#[derive(Debug, Error)]
pub enum MqttError {
    #[error("Failed to read CA certificate {path}: {source}")]
    CaCert {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Connection settings for the MQTT broker
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// Broker hostname
    pub broker_host: String,
    /// Broker port
    pub broker_port: u16,
    /// Client identifier presented to the broker
    pub client_id: String,
    /// Optional username/password credentials
    pub username: Option<String>,
    pub password: Option<String>,
    /// Root CA for TLS; plain TCP when absent
    pub ca_cert_path: Option<PathBuf>,
    /// Topics subscribed on every connection acknowledgement
    pub topics: Vec<String>,
}

/// The MQTT side of the bridge
pub struct MqttIngress {
    config: MqttConfig,
    options: MqttOptions,
    bridge: BridgeHandle,
}

impl MqttIngress {
    /// Create an ingress that forwards publishes into `bridge`
    ///
    /// Connection options are built here so that an unreadable CA
    /// certificate surfaces at startup, not inside the event loop.
    pub fn new(config: MqttConfig, bridge: BridgeHandle) -> Result<Self, MqttError> {
        let options = build_options(&config)?;
        Ok(Self {
            config,
            options,
            bridge,
        })
    }

    /// Drive the MQTT event loop forever
    ///
    /// Subscriptions are (re-)established on every ConnAck, so a broker
    /// reconnect restores them without extra bookkeeping. Connection errors
    /// are logged and the loop re-polls after a short delay, which is what
    /// triggers the reconnect.
    pub async fn run(self) {
        let Self {
            config,
            options,
            bridge,
        } = self;
        let (client, mut event_loop) = AsyncClient::new(options, 64);

        loop {
            match event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!(
                        "connected to mqtt broker {}:{}",
                        config.broker_host, config.broker_port
                    );
                    for topic in &config.topics {
                        match client.subscribe(topic, QoS::AtMostOnce).await {
                            Ok(()) => info!("subscribed to topic: {}", topic),
                            Err(e) => error!("subscribe to '{}' failed: {}", topic, e),
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    // Fan-out is text-frame based, so binary payloads that do
                    // not decode are dropped here
                    match String::from_utf8(publish.payload.to_vec()) {
                        Ok(message) => bridge.publish(&publish.topic, message),
                        Err(_) => {
                            warn!("dropping non-utf8 payload on '{}'", publish.topic)
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("mqtt connection error: {}", e);
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }
}

/// Build broker connection options from the config
fn build_options(config: &MqttConfig) -> Result<MqttOptions, MqttError> {
    let mut options = MqttOptions::new(
        config.client_id.clone(),
        config.broker_host.clone(),
        config.broker_port,
    );
    options.set_keep_alive(KEEP_ALIVE);

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        options.set_credentials(username.clone(), password.clone());
    }

    if let Some(path) = &config.ca_cert_path {
        let ca = std::fs::read(path).map_err(|source| MqttError::CaCert {
            path: path.clone(),
            source,
        })?;
        options.set_transport(Transport::Tls(TlsConfiguration::Simple {
            ca,
            alpn: None,
            client_auth: None,
        }));
    }

    Ok(options)
}
