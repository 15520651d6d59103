//! LLM Abstraction Layer
//!
//! This module provides a unified interface for generating text and typed
//! structured output from Google's Gemini models.

pub mod core;
pub mod gemini;
pub mod structured;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::LlmProvider,
    types::{
        FinishReason, GenerateReply, GenerateRequest, Message, MessageRole, StreamEvent,
        UsageMetadata,
    },
};

pub use gemini::{GeminiClient, GeminiModel};
pub use structured::generate_structured;
