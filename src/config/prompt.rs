use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use log::{ info, warn };

const BUILTIN_CHAT_CONFIG: &str = include_str!("../../json/chat.json");

const SUPPORT_EMAIL_PLACEHOLDER: &str = "{support_email}";

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Prompt file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Prompt JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Prompt field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// Static knowledge and canned replies for the chat relay.
///
/// Text fields may contain `{support_email}`, substituted once at load time.
#[derive(Deserialize, Debug, Clone)]
pub struct ChatPrompts {
    pub system_prompt: String,
    pub filtered_keywords: Vec<String>,
    pub filtered_reply: String,
    pub error_reply: String,
    pub missing_key_reply: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    10
}

impl ChatPrompts {
    fn validate(&self) -> Result<(), PromptError> {
        if self.system_prompt.trim().is_empty() {
            return Err(PromptError::EmptyField("system_prompt"));
        }
        if self.filtered_reply.trim().is_empty() {
            return Err(PromptError::EmptyField("filtered_reply"));
        }
        if self.error_reply.trim().is_empty() {
            return Err(PromptError::EmptyField("error_reply"));
        }
        if self.missing_key_reply.trim().is_empty() {
            return Err(PromptError::EmptyField("missing_key_reply"));
        }
        Ok(())
    }

    fn fill_support_email(mut self, support_email: &str) -> Self {
        for field in [
            &mut self.system_prompt,
            &mut self.filtered_reply,
            &mut self.error_reply,
            &mut self.missing_key_reply,
        ] {
            *field = field.replace(SUPPORT_EMAIL_PLACEHOLDER, support_email);
        }
        self
    }
}

pub fn load_prompts_from_str(json: &str, support_email: &str) -> Result<Arc<ChatPrompts>, PromptError> {
    let config: ChatPrompts = serde_json::from_str(json)?;
    config.validate()?;
    Ok(Arc::new(config.fill_support_email(support_email)))
}

pub fn builtin_prompts(support_email: &str) -> Result<Arc<ChatPrompts>, PromptError> {
    load_prompts_from_str(BUILTIN_CHAT_CONFIG, support_email)
}

/// Loads the chat configuration from `path`, falling back to the compiled-in
/// copy when the file does not exist. A file that exists but fails to parse is an error.
pub fn load_prompts<P: AsRef<Path>>(path: P, support_email: &str) -> Result<Arc<ChatPrompts>, PromptError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => {
            info!("Loading chat prompts from: {}", path.display());
            load_prompts_from_str(&content, support_email)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Chat prompts file '{}' not found, using built-in prompts", path.display());
            builtin_prompts(support_email)
        }
        Err(e) => Err(PromptError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_prompts_substitute_support_email() {
        let prompts = builtin_prompts("help@example.org").unwrap();
        assert!(prompts.error_reply.ends_with("help@example.org"));
        assert!(prompts.missing_key_reply.contains("help@example.org"));
        assert!(prompts.system_prompt.contains("help@example.org"));
        assert!(!prompts.system_prompt.contains(SUPPORT_EMAIL_PLACEHOLDER));
        assert_eq!(prompts.history_limit, 10);
        assert!(prompts.filtered_keywords.iter().any(|k| k == "bomb"));
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let prompts = load_prompts("does/not/exist.json", "help@example.org").unwrap();
        assert!(prompts.system_prompt.starts_with("You are Samaya Care"));
    }

    #[test]
    fn empty_system_prompt_is_rejected() {
        let json = r#"{
            "system_prompt": "  ",
            "filtered_keywords": [],
            "filtered_reply": "no",
            "error_reply": "sorry",
            "missing_key_reply": "config"
        }"#;
        let err = load_prompts_from_str(json, "x@y.z").unwrap_err();
        assert!(matches!(err, PromptError::EmptyField("system_prompt")));
    }

    #[test]
    fn history_limit_defaults_when_absent() {
        let json = r#"{
            "system_prompt": "be nice",
            "filtered_keywords": ["bad"],
            "filtered_reply": "no",
            "error_reply": "sorry",
            "missing_key_reply": "config"
        }"#;
        let prompts = load_prompts_from_str(json, "x@y.z").unwrap();
        assert_eq!(prompts.history_limit, 10);
    }
}
