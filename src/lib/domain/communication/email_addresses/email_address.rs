//! Email Address

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use EmailAddressError::*;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref WORD_START: Regex = Regex::new(r"(^|[^A-Za-z0-9_])([A-Za-z0-9_])").unwrap();
}

/// An error that can occur when creating an email address
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The email address is empty
    #[error("email is empty")]
    EmptyEmailAddress,

    /// The email address is invalid
    #[error("email \"{0}\" is invalid")]
    InvalidEmailAddress(String),
}

/// An email address
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address
    pub fn new(raw: &str) -> Result<Self, EmailAddressError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(EmptyEmailAddress);
        }

        if !EMAIL_REGEX.is_match(trimmed) {
            return Err(InvalidEmailAddress(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns `true` if `raw` would be accepted by [`EmailAddress::new`].
    pub fn is_valid(raw: &str) -> bool {
        Self::new(raw).is_ok()
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Guesses a human readable name from the local part, e.g.
    /// `john.doe@example.com` becomes `John Doe`.
    pub fn display_name(&self) -> String {
        let local = self.0.split('@').next().unwrap_or_default();
        let spaced = local.replace(['.', '_', '-'], " ");

        WORD_START
            .replace_all(&spaced, |caps: &regex::Captures<'_>| {
                format!("{}{}", &caps[1], caps[2].to_ascii_uppercase())
            })
            .into_owned()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
