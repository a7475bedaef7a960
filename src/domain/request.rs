use crate::domain::value::{MessageBody, Recipient, Sender};

/// A single outbound SMS for Twilio's "create message" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMessage {
    to: Recipient,
    from: Sender,
    body: MessageBody,
}

impl CreateMessage {
    pub fn new(to: Recipient, from: Sender, body: MessageBody) -> Self {
        Self { to, from, body }
    }

    pub fn to(&self) -> &Recipient {
        &self.to
    }

    pub fn from(&self) -> &Sender {
        &self.from
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }
}
