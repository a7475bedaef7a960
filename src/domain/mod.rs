//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::CreateMessage;
pub use response::MessageResource;
pub use validation::ValidationError;
pub use value::{
    AccountSid, AuthToken, ErrorCode, KnownErrorCode, KnownMessageStatus, MessageBody,
    MessageSid, MessageStatus, Recipient, Sender,
};
