pub mod filter;

use log::{ error, info, warn };
use std::sync::Arc;

use crate::config::prompt::ChatPrompts;
use crate::llm::{ ChatClient, LlmError };
use crate::models::chat::{ ChatMessage, ChatRequest, Role };

pub use filter::ContentFilter;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,
    #[error("chat provider API key is not configured")]
    MissingApiKey,
    #[error("chat provider failed: {0}")]
    Upstream(#[from] LlmError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    Filtered(String),
}

/// Relays one user turn to the chat provider. Stateless between requests;
/// the client resends its history every time.
pub struct ChatRelay {
    client: Option<Arc<dyn ChatClient>>,
    prompts: Arc<ChatPrompts>,
    filter: ContentFilter,
}

impl ChatRelay {
    pub fn new(client: Option<Arc<dyn ChatClient>>, prompts: Arc<ChatPrompts>) -> Self {
        if client.is_none() {
            warn!("No chat API key configured. /api/chat will answer with a configuration error.");
        }
        let filter = ContentFilter::new(&prompts.filtered_keywords);
        Self { client, prompts, filter }
    }

    pub fn prompts(&self) -> &ChatPrompts {
        &self.prompts
    }

    /// System prompt, then the most recent history turns, then the new user turn.
    /// System-role and blank history entries are dropped before truncation.
    pub fn build_messages(&self, history: Vec<ChatMessage>, message: &str) -> Vec<ChatMessage> {
        let mut turns: Vec<ChatMessage> = history
            .into_iter()
            .filter(|m| m.role != Role::System && !m.content.trim().is_empty())
            .collect();
        let overflow = turns.len().saturating_sub(self.prompts.history_limit);
        turns.drain(..overflow);

        let mut messages = Vec::with_capacity(turns.len() + 2);
        messages.push(ChatMessage::system(self.prompts.system_prompt.as_str()));
        messages.extend(turns);
        messages.push(ChatMessage::user(message));
        messages
    }

    pub async fn respond(&self, request: ChatRequest) -> Result<ChatOutcome, ChatError> {
        let message = request.message
            .filter(|m| !m.trim().is_empty())
            .ok_or(ChatError::EmptyMessage)?;

        let client = self.client.as_ref().ok_or_else(|| {
            error!("Chat API key is not set!");
            ChatError::MissingApiKey
        })?;

        // The client writes its own history, so every forwarded turn is screened.
        let messages = self.build_messages(request.history, &message);
        let matched = messages[1..]
            .iter()
            .find_map(|m| self.filter.matched_keyword(&m.content));
        if let Some(keyword) = matched {
            info!("Chat message filtered on keyword '{}'", keyword);
            return Ok(ChatOutcome::Filtered(self.prompts.filtered_reply.clone()));
        }

        let completion = client.complete(&messages).await.map_err(|e| {
            error!("Chat error ({}): {}", client.get_model(), e);
            ChatError::Upstream(e)
        })?;

        Ok(ChatOutcome::Reply(completion.response))
    }
}
