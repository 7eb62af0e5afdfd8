//! Send a single email

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::{
        dispatch::DispatchService,
        email_addresses::EmailAddress,
        mailer::{Message, SendOutcome},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Sender, subject and body shared by every copy of an email
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    /// The sender's address
    #[schema(example = "news@example.com")]
    pub from: String,

    /// The sender's display name
    #[schema(example = "Example News")]
    pub from_name: Option<String>,

    /// Where replies should go
    pub reply_to: Option<String>,

    /// The subject line
    #[schema(example = "Our spring sale starts today")]
    pub subject: String,

    /// The HTML body
    #[schema(example = "<p>Hello!</p>")]
    pub html: String,

    /// The plain text body
    pub text: Option<String>,

    /// Track opens
    pub track_opens: Option<bool>,

    /// Track clicks
    pub track_clicks: Option<bool>,
}

impl EmailContent {
    /// Builds the message for one recipient.
    pub fn message_to(&self, to: &str) -> Result<Message, ApiError> {
        if self.subject.trim().is_empty() {
            return Err(ApiError::new_422("Please provide a subject"));
        }

        let mut message = Message::new(
            EmailAddress::new(to)?,
            EmailAddress::new(&self.from)?,
            &self.subject,
            &self.html,
        )
        .with_tracking(self.track_opens, self.track_clicks);

        if let Some(name) = &self.from_name {
            message = message.with_from_name(name);
        }

        if let Some(reply_to) = self.reply_to.as_deref().filter(|r| !r.trim().is_empty()) {
            message = message.with_reply_to(EmailAddress::new(reply_to)?);
        }

        if let Some(text) = &self.text {
            message = message.with_plain_body(text);
        }

        Ok(message)
    }
}

/// Send email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailBody {
    /// The recipient's address
    #[schema(example = "email@example.com")]
    pub to: String,

    /// The email itself
    #[serde(flatten)]
    pub content: EmailContent,

    /// Campaign to attribute the email to
    pub campaign_id: Option<String>,

    /// Contact the email is addressed to
    pub contact_id: Option<String>,
}

impl TryFrom<SendEmailBody> for Message {
    type Error = ApiError;

    fn try_from(body: SendEmailBody) -> Result<Self, Self::Error> {
        let mut message = body.content.message_to(&body.to)?;

        if let Some(campaign_id) = body.campaign_id {
            message = message.with_campaign_id(campaign_id);
        }

        if let Some(contact_id) = body.contact_id {
            message = message.with_contact_id(contact_id);
        }

        Ok(message)
    }
}

/// Send email response body
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    /// Whether the backend accepted the email
    pub success: bool,

    /// The backend's message id
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "4ef9a417-02e9-4d39-ad75-9611e0fcc33c")]
    pub message_id: Option<String>,

    /// Why the email could not be sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SendOutcome> for SendEmailResponse {
    fn from(outcome: SendOutcome) -> Self {
        match outcome {
            SendOutcome::Sent { message_id } => Self {
                success: true,
                message_id,
                error: None,
            },
            SendOutcome::Failed { error } => Self {
                success: false,
                message_id: None,
                error: Some(error),
            },
        }
    }
}

/// Send a single email
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Emails",
    path = "/api/v1/emails",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email accepted", body = SendEmailResponse),
        (status = StatusCode::BAD_GATEWAY, description = "Email rejected by the delivery backend", body = SendEmailResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse),
    )
)]
pub async fn handler<D: DispatchService>(
    State(state): State<AppState<D>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SendEmailResponse>), ApiError> {
    let Json(request) = request?;
    let message: Message = request.try_into()?;

    let outcome = state.dispatch.send_email(&message).await;

    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    Ok((status, Json(outcome.into())))
}
