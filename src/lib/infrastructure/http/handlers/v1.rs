//! Version 1 of the API

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::communication::dispatch::DispatchService,
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod send_campaign;
pub mod send_email;
pub mod stoplight;
pub mod uptime;

/// Routes mounted under `/api/v1`
pub fn router<D: DispatchService>() -> Router<AppState<D>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<D>))
        .route("/emails", post(send_email::handler::<D>))
        .route(
            "/campaigns/:campaign_id/send",
            post(send_campaign::handler::<D>),
        )
}
