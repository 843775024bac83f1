pub mod validation;

use log::info;
use std::sync::Arc;

use crate::mail::{ MailError, Mailer, OutgoingMail, TemplateRenderer };
use crate::models::forms::Submission;

pub use validation::{ FormInput, ValidationError };

/// Sends the admin notification and the submitter confirmation for a
/// validated submission.
pub struct FormRelay {
    mailer: Arc<dyn Mailer>,
    renderer: Arc<dyn TemplateRenderer>,
    admin_recipient: String,
}

impl FormRelay {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        renderer: Arc<dyn TemplateRenderer>,
        admin_recipient: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            renderer,
            admin_recipient: admin_recipient.into(),
        }
    }

    /// Admin first, then confirmation. No rollback: if the confirmation
    /// fails the admin notification has already gone out.
    pub async fn relay(&self, submission: &Submission) -> Result<(), MailError> {
        let kind = submission.kind();
        let submitter = submission.submitter_email();

        let admin = self.renderer.admin_notification(submission);
        self.mailer.send(OutgoingMail {
            to: self.admin_recipient.clone(),
            reply_to: Some(submitter.to_string()),
            subject: admin.subject,
            html: admin.html,
        }).await?;

        let confirmation = self.renderer.confirmation(submission);
        self.mailer.send(OutgoingMail {
            to: submitter.to_string(),
            reply_to: None,
            subject: confirmation.subject,
            html: confirmation.html,
        }).await?;

        info!("Relayed {} submission from {}", kind, submission.submitter_name());
        Ok(())
    }
}
