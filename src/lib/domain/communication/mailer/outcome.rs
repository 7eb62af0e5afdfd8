//! Per-message delivery outcome

/// The result of attempting to deliver one [`Message`](super::Message)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend accepted the message
    Sent {
        /// The identifier assigned by the backend, if it returned one
        message_id: Option<String>,
    },

    /// The message could not be delivered
    Failed {
        /// What went wrong
        error: String,
    },
}

impl SendOutcome {
    /// A successful outcome carrying the backend's message id
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self::Sent {
            message_id: Some(message_id.into()),
        }
    }

    /// A failed outcome
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Whether the message was accepted
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// The backend's message id, if any
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Sent { message_id } => message_id.as_deref(),
            Self::Failed { .. } => None,
        }
    }

    /// The error description for a failed send
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Sent { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}
