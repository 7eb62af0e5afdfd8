//! Email message

use crate::domain::communication::email_addresses::EmailAddress;

/// An outbound email addressed to a single recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// The recipient of the email
    pub to: EmailAddress,

    /// The sender of the email
    pub from: EmailAddress,

    /// The sender's display name
    pub from_name: Option<String>,

    /// Where replies should go
    pub reply_to: Option<EmailAddress>,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,

    /// The plain text body of the email
    pub plain_body: Option<String>,

    /// Whether opens should be tracked
    pub track_opens: Option<bool>,

    /// Whether clicks should be tracked
    pub track_clicks: Option<bool>,

    /// The campaign this email belongs to
    pub campaign_id: Option<String>,

    /// The contact this email is addressed to
    pub contact_id: Option<String>,
}

impl Message {
    /// Create a new message with only the required fields set
    pub fn new(
        to: EmailAddress,
        from: EmailAddress,
        subject: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            to,
            from,
            from_name: None,
            reply_to: None,
            subject: subject.into(),
            html_body: html_body.into(),
            plain_body: None,
            track_opens: None,
            track_clicks: None,
            campaign_id: None,
            contact_id: None,
        }
    }

    /// Set the sender's display name
    pub fn with_from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    /// Set the reply-to address
    pub fn with_reply_to(mut self, reply_to: EmailAddress) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Set the plain text body
    pub fn with_plain_body(mut self, plain: impl Into<String>) -> Self {
        self.plain_body = Some(plain.into());
        self
    }

    /// Set the open and click tracking flags
    pub fn with_tracking(mut self, opens: Option<bool>, clicks: Option<bool>) -> Self {
        self.track_opens = opens;
        self.track_clicks = clicks;
        self
    }

    /// Tag the message with a campaign
    pub fn with_campaign_id(mut self, campaign_id: impl Into<String>) -> Self {
        self.campaign_id = Some(campaign_id.into());
        self
    }

    /// Tag the message with a contact
    pub fn with_contact_id(mut self, contact_id: impl Into<String>) -> Self {
        self.contact_id = Some(contact_id.into());
        self
    }

    /// The `From` header value, `"Name <address>"` when a display name is set.
    pub fn formatted_sender(&self) -> String {
        match &self.from_name {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.from),
            _ => self.from.to_string(),
        }
    }
}
