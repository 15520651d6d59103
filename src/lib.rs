// HTTP Server modules
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

// MQTT to WebSocket bridge
pub mod bridge;
pub mod mqtt;

// Chat history and sessions
pub mod chat;

// LLM abstraction layer
pub mod llm;
