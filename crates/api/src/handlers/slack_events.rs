//! Slack Events API webhook.
//!
//! Every request must carry a valid `X-Slack-Signature`. Once the signature
//! checks out the request is always acknowledged with 200, even when the
//! event itself could not be processed, so Slack does not retry it.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use cheers_core::signature::verify_signature;
use cheers_worker::inbound::{EventEnvelope, InboundOutcome};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

#[derive(Debug, Deserialize)]
struct EventKind {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    challenge: String,
}

#[derive(Debug, Default, Serialize)]
pub struct EventAck {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// POST /slack/events
pub async fn handle_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let Some(secret) = state.config.slack.signing_secret.as_deref() else {
        return Err(AppError::InternalError(
            "SLACK_SIGNING_SECRET is required for the events endpoint".to_string(),
        ));
    };

    let verified = verify_signature(
        secret,
        header(&headers, TIMESTAMP_HEADER),
        header(&headers, SIGNATURE_HEADER),
        &body,
        Utc::now().timestamp(),
    );
    if !verified {
        return Err(AppError::Unauthorized("invalid slack signature".to_string()));
    }

    let kind: EventKind = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("invalid json payload".to_string()))?;

    if kind.kind == "url_verification" {
        return Ok(Json(EventAck {
            ok: false,
            challenge: Some(kind.challenge),
        }));
    }

    if kind.kind == "event_callback" {
        match serde_json::from_slice::<EventEnvelope>(&body) {
            Ok(envelope) => match state.inbound.handle_event(&envelope).await {
                Ok(InboundOutcome::Ignored) => {}
                Ok(outcome) => tracing::debug!(?outcome, "Slack event handled"),
                Err(e) => tracing::error!(error = %e, "Failed to process Slack event"),
            },
            Err(e) => tracing::warn!(error = %e, "Undecodable Slack event envelope"),
        }
    }

    Ok(Json(EventAck {
        ok: true,
        challenge: None,
    }))
}
