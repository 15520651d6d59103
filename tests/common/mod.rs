#![allow(dead_code)]

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::Stream;
use testcontainers::{core::WaitFor, GenericImage, RunnableImage};

use uromed::chat::{ChatDbConfig, ChatStore};
use uromed::llm::{
    FinishReason, GenerateReply, GenerateRequest, LlmError, LlmProvider, StreamEvent,
};

/// The PostgreSQL Docker image to use for testing
pub const POSTGRES_IMAGE: &str = "postgres";
pub const POSTGRES_TAG: &str = "16-alpine";

/// Default PostgreSQL port
pub const POSTGRES_PORT: u16 = 5432;

/// Credentials for the test container
pub const POSTGRES_USER: &str = "postgres";
pub const POSTGRES_PASSWORD: &str = "uromed_test_password";
pub const POSTGRES_DB: &str = "uromed";

/// Create a runnable PostgreSQL container
pub fn create_postgres_container() -> RunnableImage<GenericImage> {
    let image = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
        .with_env_var("POSTGRES_USER", POSTGRES_USER)
        .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
        .with_env_var("POSTGRES_DB", POSTGRES_DB)
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ));

    RunnableImage::from(image).with_tag(POSTGRES_TAG)
}

/// Build a connection string for the running container
pub fn build_connection_string(host: &str, port: u16) -> String {
    format!(
        "postgresql://{}:{}@{}:{}/{}",
        POSTGRES_USER, POSTGRES_PASSWORD, host, port, POSTGRES_DB
    )
}

/// Connect to the test database and create the schema
///
/// The readiness message can appear before the server accepts TCP
/// connections, so the first attempts may be refused.
pub async fn connect_store(connection_string: &str) -> ChatStore {
    let config = ChatDbConfig::from_connection_string(connection_string)
        .expect("Failed to create config from connection string");

    for _ in 0..40 {
        if let Ok(store) = ChatStore::new(config.clone()).await {
            store
                .ensure_schema()
                .await
                .expect("Failed to create chat schema");
            return store;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    panic!("PostgreSQL container did not become ready in time");
}

/// Test double for the LLM provider
pub struct StubProvider {
    reply: Option<String>,
    chunks: Vec<String>,
}

impl StubProvider {
    /// A provider that answers every request with `text`
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            chunks: vec![text.to_string()],
        }
    }

    /// A provider that streams the given chunks as one reply
    pub fn streaming(chunks: &[&str]) -> Self {
        Self {
            reply: Some(chunks.concat()),
            chunks: chunks.iter().map(|chunk| chunk.to_string()).collect(),
        }
    }

    /// A provider whose requests always fail
    pub fn failing() -> Self {
        Self {
            reply: None,
            chunks: Vec::new(),
        }
    }

    fn failure() -> LlmError {
        LlmError::ProviderError {
            code: "stub_failure".to_string(),
            message: "stub provider configured to fail".to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateReply, LlmError> {
        match &self.reply {
            Some(text) => Ok(GenerateReply {
                text: text.clone(),
                finish_reason: FinishReason::Stop,
                usage: None,
            }),
            None => Err(Self::failure()),
        }
    }

    async fn stream_generate(
        &self,
        _request: GenerateRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>, LlmError> {
        if self.reply.is_none() {
            return Err(Self::failure());
        }

        let events: Vec<Result<StreamEvent, LlmError>> = self
            .chunks
            .iter()
            .map(|chunk| {
                Ok(StreamEvent::TextDelta {
                    text: chunk.clone(),
                })
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(events)))
    }
}
