//! Dispatch service

use std::{any::Any, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{task::JoinHandle, time::sleep};
use tracing::{debug, error, info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::mailer::{Mailer, Message, SendOutcome};

use super::BulkOutcome;

/// Number of messages sent concurrently in one batch
pub const BATCH_SIZE: usize = 50;

/// Pause between two consecutive batches
pub const BATCH_DELAY: Duration = Duration::from_secs(1);

/// Batching parameters for bulk sends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Maximum number of messages in flight at once
    pub batch_size: usize,

    /// Pause between batches
    pub batch_delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            batch_delay: BATCH_DELAY,
        }
    }
}

/// Dispatch service
#[async_trait]
pub trait DispatchService: Clone + Send + Sync + 'static {
    /// Sends a single email through the configured backend.
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to send.
    ///
    /// # Returns
    /// The backend's [`SendOutcome`]. Failures are reported in the outcome, never raised.
    async fn send_email(&self, message: &Message) -> SendOutcome;

    /// Sends every message of a campaign in throttled batches.
    ///
    /// Each message is attempted exactly once. A failed message never stops
    /// the remaining ones.
    ///
    /// # Arguments
    /// * `campaign_id` - The campaign the messages belong to, used for logging.
    /// * `messages` - One message per recipient, in send order.
    ///
    /// # Returns
    /// A [`BulkOutcome`] accounting for every message.
    async fn send_bulk_email(&self, campaign_id: &str, messages: &[Message]) -> BulkOutcome;
}

#[cfg(test)]
mock! {
    pub DispatchService {}

    impl Clone for DispatchService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl DispatchService for DispatchService {
        async fn send_email(&self, message: &Message) -> SendOutcome;
        async fn send_bulk_email(&self, campaign_id: &str, messages: &[Message]) -> BulkOutcome;
    }
}

/// Dispatch service implementation
#[derive(Debug, Clone)]
pub struct DispatchServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    config: DispatchConfig,
}

impl<M> DispatchServiceImpl<M>
where
    M: Mailer,
{
    /// Creates a dispatch service with the default batch size and delay.
    pub fn new(mailer: Arc<M>) -> Self {
        Self::with_config(mailer, DispatchConfig::default())
    }

    /// Creates a dispatch service with custom batching.
    pub fn with_config(mailer: Arc<M>, config: DispatchConfig) -> Self {
        Self { mailer, config }
    }

    /// Sends one batch concurrently and folds the results into `outcome`.
    ///
    /// Results are consumed in request order, so errors line up with the
    /// order of `batch` regardless of which send finishes first.
    async fn send_batch(&self, batch: &[Message], outcome: &mut BulkOutcome) {
        let handles: Vec<JoinHandle<SendOutcome>> = batch
            .iter()
            .map(|message| {
                let mailer = Arc::clone(&self.mailer);
                let message = message.clone();

                tokio::spawn(async move { mailer.send_email(&message).await })
            })
            .collect();

        for (message, handle) in batch.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) if err.is_panic() => SendOutcome::failed(
                    panic_message(err.into_panic())
                        .unwrap_or_else(|| "send task panicked".to_string()),
                ),
                Err(err) => SendOutcome::failed(err.to_string()),
            };

            match result {
                SendOutcome::Sent { .. } => outcome.record_sent(),
                SendOutcome::Failed { error } => {
                    warn!(recipient = %message.to, %error, "email was not delivered");
                    outcome.record_failure(message.to.as_str(), &error);
                }
            }
        }
    }

    /// Sends every batch of a campaign, pausing between batches.
    async fn run_campaign(self, campaign_id: String, messages: Vec<Message>) -> BulkOutcome {
        let campaign_id = campaign_id.as_str();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = messages.len().div_ceil(batch_size);

        info!(
            campaign_id,
            recipients = messages.len(),
            batches = batch_count,
            "dispatching campaign"
        );

        let mut outcome = BulkOutcome::default();

        for (index, batch) in messages.chunks(batch_size).enumerate() {
            debug!(campaign_id, batch = index + 1, size = batch.len(), "sending batch");

            self.send_batch(batch, &mut outcome).await;

            if index + 1 < batch_count {
                sleep(self.config.batch_delay).await;
            }
        }

        info!(
            campaign_id,
            sent = outcome.sent,
            failed = outcome.failed,
            "campaign dispatched"
        );

        outcome
    }
}

#[async_trait]
impl<M> DispatchService for DispatchServiceImpl<M>
where
    M: Mailer,
{
    async fn send_email(&self, message: &Message) -> SendOutcome {
        self.mailer.send_email(message).await
    }

    async fn send_bulk_email(&self, campaign_id: &str, messages: &[Message]) -> BulkOutcome {
        // Runs to completion even if the caller stops polling.
        let campaign = tokio::spawn(
            self.clone()
                .run_campaign(campaign_id.to_string(), messages.to_vec()),
        );

        match campaign.await {
            Ok(outcome) => outcome,
            Err(err) => {
                let reason = if err.is_panic() {
                    panic_message(err.into_panic())
                        .unwrap_or_else(|| "campaign task panicked".to_string())
                } else {
                    err.to_string()
                };

                error!(campaign_id, %reason, "campaign dispatch aborted");

                let mut outcome = BulkOutcome::default();
                for message in messages {
                    outcome.record_failure(message.to.as_str(), &reason);
                }
                outcome
            }
        }
    }
}

/// Extracts the message from a panic payload, if it carries one.
pub fn panic_message(payload: Box<dyn Any + Send + 'static>) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<String>() {
        Some(s.clone())
    } else {
        payload.downcast_ref::<&str>().map(|s| s.to_string())
    }
}
