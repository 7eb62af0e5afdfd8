//! Development mailer that logs emails instead of sending them

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use tokio::time::sleep;
use tracing::info;

use crate::domain::communication::mailer::{Mailer, Message, SendOutcome};

/// How long a stubbed send takes
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(100);

/// Accepts every email after a short pause and hands back a fake id.
#[derive(Debug, Clone)]
pub struct StubMailer {
    latency: Duration,
}

impl StubMailer {
    /// Create a stub mailer with a custom simulated latency
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for StubMailer {
    fn default() -> Self {
        Self::with_latency(SIMULATED_LATENCY)
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send_email(&self, message: &Message) -> SendOutcome {
        info!(
            to = %message.to,
            from = %message.formatted_sender(),
            subject = %message.subject,
            "stub mailer: pretending to send email"
        );

        sleep(self.latency).await;

        SendOutcome::sent(generate_message_id())
    }
}

/// `mock_<unix millis>_<9 random characters>`
fn generate_message_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect();

    format!("mock_{}_{}", Utc::now().timestamp_millis(), suffix)
}
