use std::process;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use uromed::bridge::BridgeService;
use uromed::chat::{ChatStore, SessionRegistry};
use uromed::config::AppConfig;
use uromed::llm::{GeminiClient, LlmProvider};
use uromed::mqtt::MqttIngress;
use uromed::routes::configure_routes;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uromed=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let store = match ChatStore::new(config.chat_db.clone()).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to the chat database: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = store.ensure_schema().await {
        error!("Failed to prepare the chat schema: {}", e);
        process::exit(1);
    }

    let provider: Arc<dyn LlmProvider> =
        match GeminiClient::new(config.google_api_key.clone(), config.gemini_model.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("Failed to create the Gemini client: {}", e);
                process::exit(1);
            }
        };

    let (service, bridge) = BridgeService::new();
    tokio::spawn(service.run());

    let ingress = match MqttIngress::new(config.mqtt.clone(), bridge.clone()) {
        Ok(ingress) => ingress,
        Err(e) => {
            error!("Failed to configure the MQTT connection: {}", e);
            process::exit(1);
        }
    };
    tokio::spawn(ingress.run());

    let sessions = SessionRegistry::new();
    let routes = configure_routes(provider, store, sessions, bridge);

    info!("Starting server on http://{}", config.http_addr);
    warp::serve(routes).run(config.http_addr).await;
}
