use crate::domain::value::{ErrorCode, MessageSid, MessageStatus};

/// Twilio's view of a message it accepted.
///
/// Only `sid` is guaranteed; the remaining fields are passed through when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageResource {
    pub sid: MessageSid,
    pub status: Option<MessageStatus>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub num_segments: Option<String>,
    pub error_code: Option<ErrorCode>,
    pub error_message: Option<String>,
}
