use async_trait::async_trait;
use log::{ debug, error };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, CompletionResponse, LlmConfig, LlmError };
use crate::models::chat::ChatMessage;

const COMPLETIONS_ROUTE: &str = "/openai/v1/chat/completions";

pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    url: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Deserialize)]
struct GroqMessage {
    content: Option<String>,
}

impl GroqChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| LlmError::Config(format!("Invalid API key format: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            model: config.model.clone(),
            url: format!("{}{}", config.base_url.trim_end_matches('/'), COMPLETIONS_ROUTE),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request<'a>(&'a self, messages: &'a [ChatMessage]) -> GroqRequest<'a> {
        GroqRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn first_choice(resp: GroqResponse) -> Result<CompletionResponse, LlmError> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|response| CompletionResponse { response })
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<CompletionResponse, LlmError> {
        debug!("Groq request to {} with {} messages", self.url, messages.len());

        let resp = self.http.post(&self.url)
            .json(&self.request(messages))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!("Groq API Error: {} {}", status, body);
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        first_choice(resp.json::<GroqResponse>().await?)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
