pub mod chat;
pub mod cli;
pub mod config;
pub mod forms;
pub mod llm;
pub mod mail;
pub mod models;
pub mod server;

use chat::ChatRelay;
use cli::Args;
use forms::FormRelay;
use llm::{ new_client, LlmConfig };
use log::{ info, warn };
use mail::{ HtmlTemplates, SmtpMailer };
use server::rate_limit::RateLimiter;
use server::{ AppState, Server, TlsPaths };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// Builds every collaborator from configuration. Nothing here touches the network.
pub fn build_state(args: &Args) -> Result<AppState, Box<dyn Error + Send + Sync>> {
    let prompts = config::prompt::load_prompts(&args.chat_config_path, &args.support_email)?;

    let chat_client = match LlmConfig::from_args(args) {
        Some(llm_config) => {
            let client = new_client(&llm_config)?;
            info!(
                "Chat client configured: Model={}, BaseURL={}",
                llm_config.model,
                llm_config.base_url
            );
            Some(client)
        }
        None => None,
    };
    let chat = Arc::new(ChatRelay::new(chat_client, prompts));

    let admin_recipient = args.admin_recipient();
    if admin_recipient.trim().is_empty() {
        warn!("Neither RECIPIENT_EMAIL nor EMAIL_USER is set. Admin notifications cannot be delivered.");
    }
    let mailer = Arc::new(SmtpMailer::from_args(args)?);
    let templates = Arc::new(HtmlTemplates::new(args.org_name.clone(), args.support_email.clone()));
    let forms = Arc::new(FormRelay::new(mailer, templates, admin_recipient));

    let limiter = Arc::new(
        RateLimiter::new(Duration::from_secs(args.rate_limit_window_secs), args.rate_limit_max)
            .trust_forwarded_for(args.trust_forwarded_for)
    );

    Ok(AppState::new(forms, chat, limiter))
}

fn tls_paths(args: &Args) -> Result<Option<TlsPaths>, Box<dyn Error + Send + Sync>> {
    if !args.enable_tls {
        info!("TLS not enabled. Running plain HTTP server.");
        return Ok(None);
    }
    match (&args.tls_cert_path, &args.tls_key_path) {
        (Some(cert_path), Some(key_path)) => Ok(Some(TlsPaths {
            cert_path: cert_path.clone(),
            key_path: key_path.clone(),
        })),
        _ => Err("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into()),
    }
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.listen_addr()?;

    info!("--- Core Configuration ---");
    info!("Environment: {}", args.environment);
    info!("Server Address: {}", addr);
    info!("CORS Origins: {}", args.cors_origins.join(", "));
    info!("Rate Limit: {} requests / {}s per IP", args.rate_limit_max, args.rate_limit_window_secs);
    info!("Trust X-Forwarded-For: {}", args.trust_forwarded_for);
    info!("SMTP Host: {}", args.smtp_host);
    info!("Email User: {}", if args.email_user.is_empty() { "(unset)" } else { args.email_user.as_str() });
    info!("Admin Recipient: {}", args.admin_recipient());
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat API Key: {}", if args.chat_api_key().is_some() { "set" } else { "(unset)" });
    info!("Chat Config Path: {}", args.chat_config_path);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    // lettre and axum-server both pull in rustls; pin the ring provider once.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let tls = tls_paths(&args)?;
    let state = build_state(&args)?;
    let app = server::router(state, &args.cors_origins);

    info!("Samaya Global backend server starting on port {}", addr.port());
    Server::new(addr, app, tls).run().await
}
