use clap::Parser;
use std::net::{ AddrParseError, SocketAddr };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:3001")]
    pub server_addr: String,

    /// Port override. When set, replaces the port of SERVER_ADDR.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Deployment environment name, only echoed at startup.
    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    /// Origins allowed by CORS (comma separated).
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "http://localhost:3000",
            "https://mohitunecha.github.io",
            "https://samayaglobal.org",
            "https://www.samayaglobal.org",
            "https://samaya-indol.vercel.app",
        ]
    )]
    pub cors_origins: Vec<String>,

    // --- Rate Limit Args ---
    /// Length of the per-IP rate limit window in seconds.
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value = "900")]
    pub rate_limit_window_secs: u64,

    /// Maximum requests per IP inside one window.
    #[arg(long, env = "RATE_LIMIT_MAX", default_value = "100")]
    pub rate_limit_max: u32,

    /// Use the first X-Forwarded-For hop as the client IP (only behind a trusted proxy).
    #[arg(long, env = "TRUST_FORWARDED_FOR", default_value = "false")]
    pub trust_forwarded_for: bool,

    // --- Mail Args ---
    /// SMTP account used to authenticate and as the From address.
    #[arg(long, env = "EMAIL_USER", default_value = "")]
    pub email_user: String,

    /// SMTP account password (app password for Gmail).
    #[arg(long, env = "EMAIL_PASSWORD", default_value = "", hide_env_values = true)]
    pub email_password: String,

    /// Inbox receiving admin notifications. Defaults to EMAIL_USER.
    #[arg(long, env = "RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,

    /// SMTP relay host.
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP relay port. Unset or 465 uses implicit TLS; other ports (587) use STARTTLS.
    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// Organization name used in email templates and the From display name.
    #[arg(long, env = "ORG_NAME", default_value = "Samaya Global")]
    pub org_name: String,

    /// Public support contact shown to users in emails and chat errors.
    #[arg(long, env = "SUPPORT_EMAIL", default_value = "samayacommunityevents@gmail.com")]
    pub support_email: String,

    // --- Chat LLM Args ---
    /// API key for the chat completion provider.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Base URL for the chat completion provider API.
    #[arg(long, env = "CHAT_BASE_URL", default_value = "https://api.groq.com")]
    pub chat_base_url: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "llama-3.3-70b-versatile")]
    pub chat_model: String,

    #[arg(long, env = "CHAT_TEMPERATURE", default_value = "0.7")]
    pub chat_temperature: f32,

    #[arg(long, env = "CHAT_MAX_TOKENS", default_value = "1024")]
    pub chat_max_tokens: u32,

    /// Optional request timeout for the chat provider. Unset keeps the HTTP client default.
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub chat_timeout_secs: Option<u64>,

    /// Path to the chat configuration file (system prompt, filter keywords, canned replies).
    #[arg(long, env = "CHAT_CONFIG_PATH", default_value = "json/chat.json")]
    pub chat_config_path: String,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// Socket address to bind, with `PORT` taking precedence over the port in `SERVER_ADDR`.
    pub fn listen_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let mut addr: SocketAddr = self.server_addr.parse()?;
        if let Some(port) = self.port {
            addr.set_port(port);
        }
        Ok(addr)
    }

    pub fn admin_recipient(&self) -> &str {
        match self.recipient_email.as_deref() {
            Some(r) if !r.trim().is_empty() => r,
            _ => &self.email_user,
        }
    }

    pub fn chat_api_key(&self) -> Option<String> {
        self.groq_api_key.clone().filter(|k| !k.trim().is_empty())
    }
}
