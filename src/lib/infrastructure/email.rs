//! Email delivery backends and their selection

use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tracing::info;

use crate::domain::communication::mailer::{Mailer, MailerError, Message, SendOutcome};

mod resend;
mod stub;

pub use resend::{ResendMailer, DEFAULT_RESEND_API_URL};
pub use stub::{StubMailer, SIMULATED_LATENCY};

/// API key value shipped in sample environments; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "development-token";

/// Mailer configuration
#[derive(Clone, Debug, Parser)]
pub struct MailerConfig {
    /// The Resend API key. Without a usable key emails are only logged.
    #[clap(long, env = "RESEND_API_KEY")]
    pub resend_api_key: Option<String>,

    /// The Resend API base URL
    #[clap(long, env = "RESEND_API_URL", default_value = DEFAULT_RESEND_API_URL)]
    pub resend_api_url: String,

    /// Timeout for a single Resend API call, in seconds
    #[clap(long, env = "RESEND_TIMEOUT_SECS", default_value = "30")]
    pub resend_timeout_secs: u64,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            resend_api_url: DEFAULT_RESEND_API_URL.to_string(),
            resend_timeout_secs: 30,
        }
    }
}

impl MailerConfig {
    /// The API key, if one is set and is not the placeholder
    pub fn live_api_key(&self) -> Option<&str> {
        self.resend_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

/// The mailer chosen at startup
#[derive(Debug, Clone)]
pub enum ConfiguredMailer {
    /// Delivers through the Resend API
    Resend(ResendMailer),

    /// Logs emails without delivering them
    Stub(StubMailer),
}

impl ConfiguredMailer {
    /// Picks the Resend mailer when a live API key is configured, the stub otherwise.
    pub fn from_config(config: &MailerConfig) -> Result<Self, MailerError> {
        match config.live_api_key() {
            Some(api_key) => {
                info!(url = %config.resend_api_url, "using the Resend mailer");

                Ok(Self::Resend(ResendMailer::new(
                    &config.resend_api_url,
                    api_key,
                    Duration::from_secs(config.resend_timeout_secs),
                )?))
            }
            None => {
                info!("no Resend API key configured, emails will only be logged");

                Ok(Self::Stub(StubMailer::default()))
            }
        }
    }

    /// A short name for the selected backend
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resend(_) => "resend",
            Self::Stub(_) => "stub",
        }
    }
}

#[async_trait]
impl Mailer for ConfiguredMailer {
    async fn send_email(&self, message: &Message) -> SendOutcome {
        match self {
            Self::Resend(mailer) => mailer.send_email(message).await,
            Self::Stub(mailer) => mailer.send_email(message).await,
        }
    }
}
