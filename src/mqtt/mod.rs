//! MQTT transport

pub mod ingress;

pub use ingress::{MqttConfig, MqttError, MqttIngress};
