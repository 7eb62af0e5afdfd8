//! Mailer errors

use thiserror::Error;

/// Errors raised while setting up a delivery backend
#[derive(Debug, Error)]
pub enum MailerError {
    /// The backend was configured without its credential
    #[error("missing API key for the {0} mailer")]
    MissingApiKey(&'static str),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}
