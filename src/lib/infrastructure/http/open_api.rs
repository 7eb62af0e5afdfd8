//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::v1::*};

/// OpenAPI document for the v1 API
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Campaign Mailer"),
    paths(
        send_email::handler,
        send_campaign::handler,
        uptime::handler
    ),
    components(schemas(
        send_email::EmailContent,
        send_email::SendEmailBody,
        send_email::SendEmailResponse,
        send_campaign::RecipientBody,
        send_campaign::SendCampaignBody,
        send_campaign::SendCampaignResponse,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
