use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{ AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor };
use log::{ debug, warn };

use super::{ MailError, Mailer, OutgoingMail };
use crate::cli::Args;

/// Port 465 (and the default) speaks TLS from the first byte; any other port,
/// typically 587, upgrades a plain connection with STARTTLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Security {
    Implicit,
    StartTls,
}

const IMPLICIT_TLS_PORT: u16 = 465;

fn security_for(port: Option<u16>) -> Security {
    match port {
        None | Some(IMPLICIT_TLS_PORT) => Security::Implicit,
        Some(_) => Security::StartTls,
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Option<Mailbox>,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: Option<u16>,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Self, MailError> {
        let security = security_for(port);
        let builder = match security {
            Security::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            Security::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
        };
        debug!("SMTP relay {} using {:?}", host, security);
        let mut builder = builder
            .map_err(|e| MailError::Transport(format!("Failed to configure SMTP relay '{}': {}", host, e)))?
            .credentials(Credentials::new(username.to_string(), password.to_string()));
        if let Some(port) = port {
            builder = builder.port(port);
        }

        // An empty account still lets the server boot; sends fail with NotConfigured.
        let from = if username.trim().is_empty() {
            warn!("EMAIL_USER is not set. Form submissions will fail to send.");
            None
        } else {
            let address = parse_mailbox(username)?.email;
            Some(Mailbox::new(Some(display_name.to_string()), address))
        };

        Ok(Self { transport: builder.build(), from })
    }

    pub fn from_args(args: &Args) -> Result<Self, MailError> {
        Self::new(
            &args.smtp_host,
            args.smtp_port,
            &args.email_user,
            &args.email_password,
            &args.org_name,
        )
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let from = self.from
            .clone()
            .ok_or_else(|| MailError::NotConfigured("EMAIL_USER is empty".to_string()))?;

        let mut builder = Message::builder()
            .from(from)
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_HTML);
        if let Some(reply_to) = &mail.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        builder.body(mail.html.clone()).map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(&mail)?;
        let response = self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        debug!("SMTP accepted message for {}: {:?}", mail.to, response.code());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail() -> OutgoingMail {
        OutgoingMail {
            to: "user@example.org".into(),
            reply_to: Some("reply@example.org".into()),
            subject: "Hello".into(),
            html: "<p>hi</p>".into(),
        }
    }

    #[tokio::test]
    async fn builds_html_message_with_display_name() {
        let mailer = SmtpMailer::new("smtp.example.org", None, "team@example.org", "pw", "Samaya Global").unwrap();
        let message = mailer.build_message(&mail()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Samaya Global"));
        assert!(raw.contains("<team@example.org>"));
        assert!(raw.contains("user@example.org"));
        assert!(raw.contains("Reply-To:"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[tokio::test]
    async fn missing_account_is_not_configured() {
        let mailer = SmtpMailer::new("smtp.example.org", None, "", "", "Samaya Global").unwrap();
        let err = mailer.send(mail()).await.unwrap_err();
        assert!(matches!(err, MailError::NotConfigured(_)));
    }

    #[test]
    fn submission_port_uses_starttls() {
        assert_eq!(security_for(None), Security::Implicit);
        assert_eq!(security_for(Some(465)), Security::Implicit);
        assert_eq!(security_for(Some(587)), Security::StartTls);
        assert_eq!(security_for(Some(25)), Security::StartTls);
    }

    #[tokio::test]
    async fn starttls_port_builds_a_mailer() {
        let mailer = SmtpMailer::new("smtp.example.org", Some(587), "team@example.org", "pw", "Samaya Global");
        assert!(mailer.is_ok());
    }

    #[tokio::test]
    async fn bad_recipient_is_an_address_error() {
        let mailer = SmtpMailer::new("smtp.example.org", None, "team@example.org", "pw", "Samaya Global").unwrap();
        let mut bad = mail();
        bad.to = "nope".into();
        assert!(matches!(mailer.build_message(&bad), Err(MailError::Address { .. })));
    }
}
