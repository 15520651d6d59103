//! Environment configuration
//!
//! All settings come from the process environment (a `.env` file is loaded
//! first when present). Only `GOOGLE_API_KEY`, `MQTT_BROKER` and
//! `CHAT_DATABASE_URL` are required; everything else has a default.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

use crate::chat::ChatDbConfig;
use crate::llm::GeminiModel;
use crate::mqtt::MqttConfig;

/// Topics bridged when MQTT_TOPICS is not set
pub const DEFAULT_TOPICS: [&str; 3] = ["uromed/ph", "uromed/color", "uromed/load_cell"];

const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8000;
const DEFAULT_MQTT_PORT: u16 = 8883;
const DEFAULT_MQTT_CLIENT_ID: &str = "uromed-backend";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {message}")]
    InvalidVar { name: &'static str, message: String },
}

/// Application configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub http_addr: SocketAddr,

    /// Generative Language API key
    pub google_api_key: String,

    /// Model used for analysis and chat
    pub gemini_model: GeminiModel,

    /// Chat history database
    pub chat_db: ChatDbConfig,

    /// MQTT broker connection
    pub mqtt: MqttConfig,
}

impl AppConfig {
    /// Read the configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = optional("HTTP_HOST").unwrap_or_else(|| DEFAULT_HTTP_HOST.to_string());
        let host: IpAddr = host.parse().map_err(|_| ConfigError::InvalidVar {
            name: "HTTP_HOST",
            message: format!("not an IP address: {}", host),
        })?;
        let port = parse_port("HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let http_addr = SocketAddr::new(host, port);

        let google_api_key = require("GOOGLE_API_KEY")?;
        let gemini_model = match optional("GEMINI_MODEL") {
            Some(raw) => parse_model(&raw)?,
            None => GeminiModel::Gemini20Flash,
        };

        let chat_db_url = require("CHAT_DATABASE_URL")?;
        let chat_db =
            ChatDbConfig::from_connection_string(&chat_db_url).map_err(|e| {
                ConfigError::InvalidVar {
                    name: "CHAT_DATABASE_URL",
                    message: e.to_string(),
                }
            })?;

        let mqtt = MqttConfig {
            broker_host: require("MQTT_BROKER")?,
            broker_port: parse_port("MQTT_PORT", DEFAULT_MQTT_PORT)?,
            client_id: optional("MQTT_CLIENT_ID")
                .unwrap_or_else(|| DEFAULT_MQTT_CLIENT_ID.to_string()),
            username: optional("MQTT_USERNAME"),
            password: optional("MQTT_PASSWORD"),
            ca_cert_path: optional("MQTT_CA_CERT").map(PathBuf::from),
            topics: optional("MQTT_TOPICS")
                .map(|raw| parse_topics(&raw))
                .unwrap_or_else(default_topics),
        };

        Ok(Self {
            http_addr,
            google_api_key,
            gemini_model,
            chat_db,
            mqtt,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

// Unset and empty are treated the same.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_port(name: &'static str, default: u16) -> Result<u16, ConfigError> {
    match optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            name,
            message: format!("not a port number: {}", raw),
        }),
        None => Ok(default),
    }
}

fn parse_model(raw: &str) -> Result<GeminiModel, ConfigError> {
    match raw {
        "gemini-2.0-flash" => Ok(GeminiModel::Gemini20Flash),
        "gemini-2.5-flash" => Ok(GeminiModel::Gemini25Flash),
        "gemini-2.5-pro" => Ok(GeminiModel::Gemini25Pro),
        other => Err(ConfigError::InvalidVar {
            name: "GEMINI_MODEL",
            message: format!(
                "unknown model {}, expected one of gemini-2.0-flash, gemini-2.5-flash, gemini-2.5-pro",
                other
            ),
        }),
    }
}

fn parse_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|topic| topic.to_string()).collect()
}
