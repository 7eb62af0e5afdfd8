//! Send a campaign to a list of recipients

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    domain::communication::{dispatch::DispatchService, mailer::Message},
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

use super::send_email::EmailContent;

/// A campaign recipient
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipientBody {
    /// The recipient's address
    #[schema(example = "email@example.com")]
    pub email: String,

    /// The recipient's contact id
    pub contact_id: Option<String>,
}

/// Send campaign request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignBody {
    /// The email every recipient receives
    #[serde(flatten)]
    pub content: EmailContent,

    /// Who to send the campaign to
    pub recipients: Vec<RecipientBody>,
}

impl SendCampaignBody {
    /// Expands the body into one message per recipient.
    fn into_messages(self, campaign_id: &str) -> Result<Vec<Message>, ApiError> {
        if self.recipients.is_empty() {
            return Err(ApiError::new_422("Please provide at least one recipient"));
        }

        self.recipients
            .into_iter()
            .map(|recipient| {
                let message = self
                    .content
                    .message_to(&recipient.email)?
                    .with_campaign_id(campaign_id);

                Ok(match recipient.contact_id {
                    Some(contact_id) => message.with_contact_id(contact_id),
                    None => message,
                })
            })
            .collect()
    }
}

/// Send campaign response body
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignResponse {
    /// `true` when every email was accepted
    pub success: bool,

    /// Number of emails accepted
    #[schema(example = 120)]
    pub successful: usize,

    /// Number of emails that failed
    #[schema(example = 0)]
    pub failed: usize,

    /// The first few per-recipient errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Send a campaign
#[utoipa::path(
    post,
    operation_id = "send_campaign",
    tag = "Campaigns",
    path = "/api/v1/campaigns/{campaign_id}/send",
    params(
        ("campaign_id" = String, Path, description = "The campaign being sent", example = "cmp_01j2k3"),
    ),
    request_body = SendCampaignBody,
    responses(
        (status = StatusCode::OK, description = "Campaign dispatched", body = SendCampaignResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse, example = json!({ "error": "\"not an email\" is not a valid email address" })),
    )
)]
pub async fn handler<D: DispatchService>(
    State(state): State<AppState<D>>,
    Path(campaign_id): Path<String>,
    request: Result<Json<SendCampaignBody>, JsonRejection>,
) -> Result<Json<SendCampaignResponse>, ApiError> {
    let Json(request) = request?;
    let messages = request.into_messages(&campaign_id)?;

    let outcome = state
        .dispatch
        .send_bulk_email(&campaign_id, &messages)
        .await;

    info!(
        campaign_id = %campaign_id,
        successful = outcome.sent,
        failed = outcome.failed,
        "campaign send finished"
    );

    Ok(Json(SendCampaignResponse {
        success: outcome.success(),
        successful: outcome.sent,
        failed: outcome.failed,
        errors: outcome.error_preview(state.config.error_preview_limit),
    }))
}
