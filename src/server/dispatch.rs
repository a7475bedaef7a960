use crate::client::{Auth, BoxFuture, TwilioClient, TwilioError};
use crate::config::ProviderSettings;
use crate::domain::{CreateMessage, MessageBody, MessageSid, Recipient, Sender, ValidationError};

/// Delivers one SOS text and returns the provider's message identifier.
pub trait Dispatch: Send + Sync {
    fn dispatch<'a>(
        &'a self,
        recipient: &'a str,
        message: &'a str,
    ) -> BoxFuture<'a, Result<MessageSid, TwilioError>>;
}

/// [`Dispatch`] backed by the Twilio Messages API.
///
/// Built once at startup. Missing credentials or sender do not prevent
/// startup; every dispatch then fails with the retained validation error.
pub struct TwilioDispatcher {
    provider: Result<(TwilioClient, Sender), ValidationError>,
}

impl TwilioDispatcher {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, TwilioError> {
        let validated = Auth::new(
            settings.account_sid.clone().unwrap_or_default(),
            settings.auth_token.clone().unwrap_or_default(),
        )
        .and_then(|auth| {
            let sender = Sender::new(settings.sender.clone().unwrap_or_default())?;
            Ok((auth, sender))
        });

        let provider = match validated {
            Ok((auth, sender)) => {
                let mut builder = TwilioClient::builder(auth)
                    .base_url(settings.base_url.clone())
                    .user_agent(concat!("sos-relay/", env!("CARGO_PKG_VERSION")));
                if let Some(timeout) = settings.timeout {
                    builder = builder.timeout(timeout);
                }
                Ok((builder.build()?, sender))
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "Twilio is not fully configured; SOS dispatch will fail"
                );
                Err(err)
            }
        };

        Ok(Self { provider })
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_ok()
    }
}

impl Dispatch for TwilioDispatcher {
    fn dispatch<'a>(
        &'a self,
        recipient: &'a str,
        message: &'a str,
    ) -> BoxFuture<'a, Result<MessageSid, TwilioError>> {
        Box::pin(async move {
            let (client, sender) = self.provider.as_ref().map_err(|err| err.clone())?;
            let request = CreateMessage::new(
                Recipient::new(recipient)?,
                sender.clone(),
                MessageBody::new(message)?,
            );
            let resource = client.create_message(request).await?;
            Ok(resource.sid)
        })
    }
}
