//! Messages exchanged between transports and the dialogue bridge.

/// A chat message received by a transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Source channel identifier (e.g. "telegram", "cli").
    pub channel: String,
    /// Chat the reply goes back to.
    pub chat_id: String,
    /// Sender identity, stable across messages.
    pub user_id: String,
    /// Sender display name (Telegram first name).
    pub user_name: String,
    pub content: String,
}

/// A reply for one chat. Replies for a chat are delivered in publish order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel: String,
    pub chat_id: String,
    pub content: String,
}

impl InboundMessage {
    /// A message typed into the local console.
    pub fn local(content: &str) -> Self {
        Self {
            channel: "cli".into(),
            chat_id: "direct".into(),
            user_id: "local".into(),
            user_name: "friend".into(),
            content: content.into(),
        }
    }
}

impl OutboundMessage {
    pub fn reply(channel: impl Into<String>, chat_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            chat_id: chat_id.into(),
            content: content.into(),
        }
    }

    /// Reply on the channel and chat the inbound message came from.
    pub fn answering(msg: &InboundMessage, content: impl Into<String>) -> Self {
        Self::reply(msg.channel.as_str(), msg.chat_id.as_str(), content)
    }
}
