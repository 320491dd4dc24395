use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::telephony::connect_stream;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /make-outbound-call`.
#[derive(Debug, Default, Deserialize)]
pub struct OutboundCallRequest {
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OutboundCallResponse {
    pub message: String,
    #[serde(rename = "callSid")]
    pub call_sid: String,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "message": "Server is running" }))
}

/// TwiML instructing Twilio to stream the call's audio to `/media-stream`
/// on the host the webhook was delivered to.
pub async fn incoming_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.public_host());

    info!(%host, "Incoming call, connecting media stream");

    ([(header::CONTENT_TYPE, "text/xml")], connect_stream(&host))
}

/// Place an outbound call that connects to the agent when answered.
///
/// The body is parsed leniently: anything that does not yield a non-empty
/// `to` is treated as a missing destination.
pub async fn outbound_call(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<OutboundCallResponse>> {
    let request = if body.is_empty() {
        OutboundCallRequest::default()
    } else {
        serde_json::from_slice::<OutboundCallRequest>(&body).unwrap_or_else(|e| {
            warn!("Ignoring unparseable outbound call body: {}", e);
            OutboundCallRequest::default()
        })
    };

    let to = request
        .to
        .filter(|to| !to.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Destination phone number is required".into()))?;

    let callback_url = state.config.callback_url();
    let call_sid = state
        .call_provider
        .create_call(&to, &callback_url)
        .await
        .map_err(|e| {
            error!(%to, "Failed to initiate outbound call: {}", e);
            AppError::Provider("Failed to initiate call".into())
        })?;

    info!(%to, %call_sid, "Outbound call initiated");

    Ok(Json(OutboundCallResponse {
        message: "Call initiated".to_string(),
        call_sid,
    }))
}
