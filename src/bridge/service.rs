//! Single-owner bridge service
//!
//! The registry is owned by one task; every mutation and every broadcast
//! arrives as a command over a channel. WebSocket sessions and the MQTT
//! ingress hold cloneable [`BridgeHandle`]s and never touch the registry
//! directly, so no lock is taken anywhere on the delivery path.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::registry::{Subscriber, SubscriberId, TopicRegistry};

/// Commands accepted by the bridge task
pub enum BridgeCommand {
    /// Subscribe a connection's outbound channel to a topic
    Register {
        topic: String,
        id: SubscriberId,
        sender: Subscriber,
    },
    /// Remove a connection from a topic
    Unregister { topic: String, id: SubscriberId },
    /// Fan a message out to a topic's subscribers
    Publish { topic: String, message: String },
}

/// Cloneable sender side of the bridge
///
/// Safe to use from any task, including ones driven by foreign event loops.
#[derive(Clone)]
pub struct BridgeHandle {
    commands: mpsc::UnboundedSender<BridgeCommand>,
}

impl BridgeHandle {
    /// Subscribe `sender` to `topic` under `id`
    pub fn register(&self, topic: &str, id: SubscriberId, sender: Subscriber) {
        self.send(BridgeCommand::Register {
            topic: topic.to_string(),
            id,
            sender,
        });
    }

    /// Remove `id` from `topic`
    pub fn unregister(&self, topic: &str, id: SubscriberId) {
        self.send(BridgeCommand::Unregister {
            topic: topic.to_string(),
            id,
        });
    }

    /// Fan `message` out to the subscribers of `topic`
    pub fn publish(&self, topic: &str, message: String) {
        self.send(BridgeCommand::Publish {
            topic: topic.to_string(),
            message,
        });
    }

    fn send(&self, command: BridgeCommand) {
        if self.commands.send(command).is_err() {
            // Only happens when the bridge task has already stopped
            warn!("bridge service is gone, command dropped");
        }
    }
}

/// The bridge task state: the registry plus the command receiver
pub struct BridgeService {
    registry: TopicRegistry,
    commands: mpsc::UnboundedReceiver<BridgeCommand>,
}

impl BridgeService {
    /// Create a service and a handle to it
    pub fn new() -> (Self, BridgeHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                registry: TopicRegistry::new(),
                commands: rx,
            },
            BridgeHandle { commands: tx },
        )
    }

    /// Drive the bridge until every handle has been dropped
    ///
    /// Commands are applied strictly in arrival order, which is what keeps
    /// per-subscriber delivery order equal to transport arrival order within
    /// a topic.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }
        debug!("bridge service stopped");
    }

    fn apply(&mut self, command: BridgeCommand) {
        match command {
            BridgeCommand::Register { topic, id, sender } => {
                debug!("subscriber {} registered on '{}'", id, topic);
                self.registry.register(&topic, id, sender);
            }
            BridgeCommand::Unregister { topic, id } => {
                debug!("subscriber {} unregistered from '{}'", id, topic);
                self.registry.unregister(&topic, id);
            }
            BridgeCommand::Publish { topic, message } => {
                let delivered = self.registry.broadcast(&topic, &message);
                debug!("delivered '{}' message to {} subscriber(s)", topic, delivered);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_register_then_publish_round_trip() {
        let (service, handle) = BridgeService::new();
        let task = tokio::spawn(service.run());

        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.register("x", id, tx);
        handle.publish("x", "42".to_string());

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame, "42");

        drop(handle);
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        let (service, handle) = BridgeService::new();
        let task = tokio::spawn(service.run());

        let id = Uuid::new_v4();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.register("x", id, tx);
        handle.unregister("x", id);
        handle.publish("x", "later".to_string());

        drop(handle);
        task.await.unwrap();

        // The channel is still open, so an empty channel proves no delivery
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_service_stops_when_handles_drop() {
        let (service, handle) = BridgeService::new();
        let task = tokio::spawn(service.run());

        let second = handle.clone();
        drop(handle);
        drop(second);

        task.await.unwrap();
    }
}
