//! HTTP relay that forwards SOS text messages through the Twilio Messages API.
//!
//! The crate has two halves:
//! - a typed Twilio client, split into a domain layer of validated types, a
//!   transport layer for wire-format details, and a small client layer issuing
//!   the HTTP call;
//! - an axum router exposing `POST /send_sos`, which checks the request body,
//!   dispatches through the client, and reports the outcome as JSON.
//!
//! ```rust,no_run
//! use sos_relay::{Auth, CreateMessage, MessageBody, Recipient, Sender, TwilioClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sos_relay::TwilioError> {
//!     let client = TwilioClient::new(Auth::new("AC...", "...")?)?;
//!     let request = CreateMessage::new(
//!         Recipient::new("+15551234567")?,
//!         Sender::new("+15557654321")?,
//!         MessageBody::new("help")?,
//!     );
//!     let message = client.create_message(request).await?;
//!     println!("{}", message.sid);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod server;
mod transport;

pub use client::{Auth, TwilioClient, TwilioClientBuilder, TwilioError};
pub use config::{ConfigError, ProviderSettings, Settings};
pub use domain::{
    CreateMessage, ErrorCode, MessageBody, MessageResource, MessageSid, MessageStatus, Recipient,
    Sender, ValidationError,
};
pub use server::{AppState, Dispatch, SosError, TwilioDispatcher};
