pub mod smtp;
pub mod templates;

use async_trait::async_trait;

pub use smtp::SmtpMailer;
pub use templates::{ HtmlTemplates, RenderedEmail, TemplateRenderer };

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Build(String),
    #[error("mail transport error: {0}")]
    Transport(String),
    #[error("mail transport not configured: {0}")]
    NotConfigured(String),
}

/// One fully rendered HTML email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

/// Delivery side of the form relay. Implementations own the sender identity
/// and credentials; callers only provide recipients and content.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}
