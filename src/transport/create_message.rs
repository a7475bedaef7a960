use serde::Deserialize;

use crate::domain::{
    CreateMessage, ErrorCode, MessageBody, MessageResource, MessageSid, MessageStatus, Recipient,
    Sender, ValidationError,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid message resource: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJsonResponse {
    sid: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    num_segments: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Error document Twilio returns with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub more_info: Option<String>,
}

pub fn encode_create_message_form(request: &CreateMessage) -> Vec<(String, String)> {
    vec![
        (Recipient::FIELD.to_owned(), request.to().as_str().to_owned()),
        (Sender::FIELD.to_owned(), request.from().as_str().to_owned()),
        (
            MessageBody::FIELD.to_owned(),
            request.body().as_str().to_owned(),
        ),
    ]
}

pub fn decode_message_json_response(json: &str) -> Result<MessageResource, TransportError> {
    let parsed: MessageJsonResponse = serde_json::from_str(json)?;

    Ok(MessageResource {
        sid: MessageSid::new(parsed.sid)?,
        status: parsed.status.map(MessageStatus::new),
        to: parsed.to,
        from: parsed.from,
        num_segments: parsed.num_segments,
        error_code: parsed.error_code.map(ErrorCode::new),
        error_message: parsed.error_message,
    })
}

/// Decode a Twilio error document. Returns `None` when the body is not one.
pub fn decode_api_error_json(json: &str) -> Option<ApiErrorBody> {
    serde_json::from_str::<ApiErrorBody>(json)
        .ok()
        .filter(|body| !body.message.trim().is_empty())
}
