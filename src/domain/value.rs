use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio account identifier (`AC...`).
///
/// Invariant: non-empty after trimming.
pub struct AccountSid(String);

impl AccountSid {
    /// Name used in validation errors; the value itself travels in the URL path.
    pub const FIELD: &'static str = "AccountSid";

    /// Create a validated [`AccountSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated account sid.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Twilio auth token, sent as the HTTP basic-auth password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct AuthToken(String);

impl AuthToken {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "AuthToken";

    /// Create a validated [`AuthToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the token as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Destination address (`To`).
///
/// No format validation is applied; Twilio decides whether the address is reachable.
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct Recipient(String);

impl Recipient {
    /// Form field name used by Twilio (`To`).
    pub const FIELD: &'static str = "To";

    /// Create a validated [`Recipient`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the address as sent to Twilio.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender address (`From`): a Twilio number or alphanumeric sender enabled on the account.
///
/// Invariant: non-empty after trimming.
pub struct Sender(String);

impl Sender {
    /// Form field name used by Twilio (`From`).
    pub const FIELD: &'static str = "From";

    /// Create a validated [`Sender`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`Body`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageBody(String);

impl MessageBody {
    /// Form field name used by Twilio (`Body`).
    pub const FIELD: &'static str = "Body";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Twilio message identifier (`sid`, usually `SM...` or `MM...`).
///
/// Invariant: non-empty after trimming.
pub struct MessageSid(String);

impl MessageSid {
    /// JSON field name used by Twilio (`sid`).
    pub const FIELD: &'static str = "sid";

    /// Create a validated [`MessageSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sid.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Message status string reported by Twilio.
///
/// Unknown values are kept verbatim so newer API statuses do not break decoding.
pub struct MessageStatus(String);

impl MessageStatus {
    /// Wrap a status string as returned by the API.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map to a documented status, if this value is one.
    pub fn known_kind(&self) -> Option<KnownMessageStatus> {
        KnownMessageStatus::from_status(&self.0)
    }

    /// Whether Twilio reported a terminal failure for the message.
    pub fn is_failure(&self) -> bool {
        self.known_kind().is_some_and(KnownMessageStatus::is_failure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Documented Twilio message lifecycle statuses.
pub enum KnownMessageStatus {
    Queued,
    Accepted,
    Scheduled,
    Sending,
    Sent,
    Delivered,
    Undelivered,
    Failed,
    Receiving,
    Received,
    Read,
    Canceled,
    PartiallyDelivered,
}

impl KnownMessageStatus {
    /// Map a Twilio status string to a known variant.
    pub fn from_status(value: &str) -> Option<Self> {
        Some(match value {
            "queued" => Self::Queued,
            "accepted" => Self::Accepted,
            "scheduled" => Self::Scheduled,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "undelivered" => Self::Undelivered,
            "failed" => Self::Failed,
            "receiving" => Self::Receiving,
            "received" => Self::Received,
            "read" => Self::Read,
            "canceled" => Self::Canceled,
            "partially_delivered" => Self::PartiallyDelivered,
            _ => return None,
        })
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Undelivered | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Numeric Twilio error code (`code` in error documents, `error_code` on messages).
pub struct ErrorCode(i64);

impl ErrorCode {
    /// Construct an error code from its integer representation.
    pub fn new(code: i64) -> Self {
        Self(code)
    }

    /// Return the raw integer code.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Map to a known error kind, if present.
    pub fn known_kind(self) -> Option<KnownErrorCode> {
        KnownErrorCode::from_code(self.0)
    }

    /// Whether the same request may succeed later.
    pub fn is_retryable(self) -> bool {
        self.known_kind().is_some_and(KnownErrorCode::is_retryable)
    }

    /// Whether the code indicates invalid or missing credentials.
    pub fn is_auth_error(self) -> bool {
        self.known_kind().is_some_and(KnownErrorCode::is_auth_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Twilio error codes commonly returned by the Messages API.
pub enum KnownErrorCode {
    /// 20003: authentication failed.
    AuthenticationFailed,
    /// 20404: the requested resource was not found (e.g. unknown account sid).
    NotFound,
    /// 20429: too many requests.
    TooManyRequests,
    /// 21211: invalid `To` phone number.
    InvalidToNumber,
    /// 21212: invalid `From` phone number.
    InvalidFromNumber,
    /// 21408: permission to send to the destination region is not enabled.
    RegionNotEnabled,
    /// 21602: message body is required.
    BodyRequired,
    /// 21606: the `From` number is not SMS-capable.
    FromNotSmsCapable,
    /// 21610: the recipient has unsubscribed.
    RecipientUnsubscribed,
    /// 21614: the `To` number is not a mobile number.
    ToNotMobile,
    /// 30001: message queue overflow.
    QueueOverflow,
}

impl KnownErrorCode {
    /// Map an integer code to a known variant.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            20003 => Self::AuthenticationFailed,
            20404 => Self::NotFound,
            20429 => Self::TooManyRequests,
            21211 => Self::InvalidToNumber,
            21212 => Self::InvalidFromNumber,
            21408 => Self::RegionNotEnabled,
            21602 => Self::BodyRequired,
            21606 => Self::FromNotSmsCapable,
            21610 => Self::RecipientUnsubscribed,
            21614 => Self::ToNotMobile,
            30001 => Self::QueueOverflow,
            _ => return None,
        })
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::TooManyRequests | Self::QueueOverflow)
    }

    pub fn is_auth_error(self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}
