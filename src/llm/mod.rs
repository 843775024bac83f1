pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Args;
use crate::models::chat::ChatMessage;

pub use groq::GroqChatClient;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider returned no choices")]
    EmptyResponse,
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Option<Duration>,
}

impl LlmConfig {
    /// `None` when no API key is configured.
    pub fn from_args(args: &Args) -> Option<Self> {
        let api_key = args.chat_api_key()?;
        Some(Self {
            api_key,
            base_url: args.chat_base_url.clone(),
            model: args.chat_model.clone(),
            temperature: args.chat_temperature,
            max_tokens: args.chat_max_tokens,
            timeout: args.chat_timeout_secs.map(Duration::from_secs),
        })
    }
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One non-streaming completion over the full message list.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = GroqChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
