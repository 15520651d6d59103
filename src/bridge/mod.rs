//! MQTT → WebSocket fan-out bridge
//!
//! Messages arriving on MQTT topics are forwarded, one text frame per
//! message, to every WebSocket client subscribed to that topic. Delivery is
//! fire-and-forget: no acknowledgement, no retry, no ordering guarantee
//! across subscribers. Within one topic, each subscriber sees messages in
//! transport arrival order.

pub mod registry;
pub mod service;
pub mod session;

// Re-export main types for convenience
pub use registry::{Subscriber, SubscriberId, TopicRegistry};
pub use service::{BridgeCommand, BridgeHandle, BridgeService};
pub use session::handle_connection;
