//! HTTP surface: the `POST /send_sos` endpoint and its cross-origin policy.
//!
//! The handler checks that `recipient` and `message` are present, hands them
//! to a [`Dispatch`] implementation, and maps the outcome to JSON:
//!
//! | Outcome | Status | Body |
//! |---|---|---|
//! | sent | 200 | `{"status": "sent", "message_sid": "..."}` |
//! | field missing / body not JSON | 400 | `{"error": "Missing recipient or message"}` |
//! | provider failure | 500 | `{"error": "<provider description>"}` |

mod dispatch;
mod error;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::domain::ErrorCode;

pub use dispatch::{Dispatch, TwilioDispatcher};
pub use error::{MISSING_FIELDS, SosError};

/// Shared, immutable state handed to every request.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<dyn Dispatch>,
}

impl AppState {
    pub fn new(dispatcher: Arc<dyn Dispatch>) -> Self {
        Self { dispatcher }
    }
}

/// A presence-checked SOS request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosRequest {
    pub recipient: String,
    pub message: String,
}

impl SosRequest {
    /// Parse a raw request body.
    ///
    /// Only presence is checked: both keys must exist on a JSON object and be
    /// non-null. Non-string values are forwarded as their JSON text.
    pub fn from_body(body: &[u8]) -> Result<Self, SosError> {
        let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
            return Err(SosError::MissingFields);
        };
        let recipient = fields.remove("recipient").and_then(field_text);
        let message = fields.remove("message").and_then(field_text);
        match (recipient, message) {
            (Some(recipient), Some(message)) => Ok(Self { recipient, message }),
            _ => Err(SosError::MissingFields),
        }
    }
}

fn field_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Serialize)]
pub struct SentBody {
    status: &'static str,
    message_sid: String,
}

/// Build the application router with tracing and CORS applied to every route.
pub fn router(state: AppState, allowed_origin: HeaderValue) -> Router {
    Router::new()
        .route("/send_sos", post(send_sos))
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed requests from a single origin; methods and headers are mirrored.
pub fn cors_layer(allowed_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn send_sos(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SentBody>, SosError> {
    let request = SosRequest::from_body(&body).inspect_err(|_| {
        debug!(len = body.len(), "rejected SOS request without recipient or message");
    })?;

    match state
        .dispatcher
        .dispatch(&request.recipient, &request.message)
        .await
    {
        Ok(sid) => {
            info!(message_sid = %sid, "SOS message sent");
            Ok(Json(SentBody {
                status: "sent",
                message_sid: sid.into_string(),
            }))
        }
        Err(err) => {
            let code = err.code();
            warn!(
                error = %err,
                code = code.map(ErrorCode::as_i64),
                retryable = code.is_some_and(ErrorCode::is_retryable),
                auth_error = code.is_some_and(ErrorCode::is_auth_error),
                "SOS message delivery failed"
            );
            Err(err.into())
        }
    }
}
