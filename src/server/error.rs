use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::client::TwilioError;

/// Fixed text for requests that lack either required field.
pub const MISSING_FIELDS: &str = "Missing recipient or message";

/// Every way an SOS request can fail. Both kinds end at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum SosError {
    /// Body unparseable, not an object, or `recipient`/`message` absent.
    #[error("Missing recipient or message")]
    MissingFields,

    /// Anything that went wrong while handing the message to Twilio.
    #[error(transparent)]
    Delivery(#[from] TwilioError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl SosError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SosError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
