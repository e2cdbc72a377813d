//! Axum route handlers for the chat relay and the debug echo endpoint

use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use http::StatusCode;
use http::header::{self, HeaderMap, HeaderValue};
use relay_config::CHAT_PATH;
use relay_core::HttpError;
use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;
use crate::state::ChatState;
use crate::types::InboundChatRequest;
use crate::upstream::UpstreamReply;

const DEBUG_MESSAGE: &str = "Debug request received successfully";

/// Build the chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new().route(CHAT_PATH, routing::post(chat)).with_state(state)
}

/// Handle `POST /chat`
async fn chat(State(state): State<ChatState>, headers: HeaderMap, body: Result<Bytes, BytesRejection>) -> Response {
    tracing::info!("received chat request");

    match relay(&state, &headers, body).await {
        Ok(reply) => {
            tracing::info!(status = %reply.status, "relayed upstream response");
            reply_response(reply)
        }
        Err(e) => {
            tracing::warn!(status = %e.status_code(), error = %e, "chat request failed");
            error_response(&e)
        }
    }
}

async fn relay(
    state: &ChatState,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<UpstreamReply, ChatError> {
    let value = parse_body(headers, body)?;
    let inbound = InboundChatRequest::from_value(value)?;
    let outbound = state.policy().build(inbound);

    tracing::info!(model = %outbound.model, messages = outbound.messages.len(), "forwarding to upstream");

    state.upstream().send(&outbound).await
}

#[derive(Debug, Serialize)]
struct DebugResponse {
    received: Value,
    message: &'static str,
}

/// Handle `POST /debug` by echoing the parsed body
pub async fn debug_echo(headers: HeaderMap, body: Result<Bytes, BytesRejection>) -> Response {
    match parse_body(&headers, body) {
        Ok(received) => {
            tracing::info!("debug request received");
            tracing::debug!(body = %received, "debug request body");
            Json(DebugResponse {
                received,
                message: DEBUG_MESSAGE,
            })
            .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Decode the request body as JSON
///
/// Bodies that are empty or not declared as JSON are read as an empty object,
/// so they reach field validation instead of failing on the media type.
fn parse_body(headers: &HeaderMap, body: Result<Bytes, BytesRejection>) -> Result<Value, ChatError> {
    let bytes = body.map_err(|rejection| ChatError::MalformedBody {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    if bytes.is_empty() || !is_json_content_type(headers) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(&bytes).map_err(|e| ChatError::MalformedBody {
        status: StatusCode::BAD_REQUEST,
        message: format!("Failed to parse the request body as JSON: {e}"),
    })
}

/// `application/json` or any `application/*+json` media type
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    essence
        .strip_prefix("application/")
        .is_some_and(|subtype| subtype == "json" || subtype.ends_with("+json"))
}

/// Relay the upstream body untouched with the upstream status
fn reply_response(reply: UpstreamReply) -> Response {
    (
        reply.status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        reply.body,
    )
        .into_response()
}

fn error_response(error: &ChatError) -> Response {
    (error.status_code(), Json(error.to_body())).into_response()
}
