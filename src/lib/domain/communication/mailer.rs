//! Delivery backends

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;
mod outcome;

pub use errors::MailerError;
pub use message::Message;
pub use outcome::SendOutcome;

/// A delivery backend.
///
/// Implementations never fail from the caller's point of view: transport
/// errors and provider rejections are reported through
/// [`SendOutcome::Failed`].
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send a single email
    ///
    /// # Arguments
    /// * `message` - The [`Message`] to deliver.
    ///
    /// # Returns
    /// Exactly one [`SendOutcome`] for the message.
    async fn send_email(&self, message: &Message) -> SendOutcome;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, message: &Message) -> SendOutcome;
    }
}

#[cfg(test)]
pub mod tests {
    pub use super::MockMailer;
}
