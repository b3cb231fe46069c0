use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, warn};

use crate::bus::events::InboundMessage;
use crate::bus::MessageBus;

const CHANNEL: &str = "telegram";

/// Long-polling Telegram transport.
///
/// Text messages go onto the bus; replies published for the `telegram`
/// channel are sent back to their chat. Delivery failures are logged and
/// not retried.
pub struct TelegramTransport {
    token: String,
    bus: Arc<MessageBus>,
    allow_from: Vec<String>,
}

impl TelegramTransport {
    pub fn new(token: String, bus: Arc<MessageBus>, allow_from: Vec<String>) -> Self {
        Self {
            token,
            bus,
            allow_from,
        }
    }

    pub async fn run(self) -> Result<()> {
        let bot = Bot::new(&self.token);
        info!("Telegram transport started");

        // A leftover webhook makes long polling fail with TerminatedByOtherGetUpdates.
        if let Err(e) = bot.delete_webhook().send().await {
            warn!("Failed to delete webhook: {}", e);
        }

        // Register delivery before the dispatcher can produce any replies.
        let bot_out = bot.clone();
        self.bus
            .on_outbound(CHANNEL, move |msg| {
                let bot_out = bot_out.clone();
                async move {
                    let Ok(chat_id) = msg.chat_id.parse::<i64>() else {
                        warn!(chat_id = msg.chat_id, "Reply for a non-numeric Telegram chat id");
                        return;
                    };
                    if let Err(e) = bot_out.send_message(ChatId(chat_id), msg.content).await {
                        error!(chat_id, "Failed to send Telegram message: {}", e);
                    }
                }
            })
            .await;

        let handler = Update::filter_message().endpoint(
            |msg: Message, bus: Arc<MessageBus>, allow_from: Arc<Vec<String>>| async move {
                let Some(from) = msg.from.as_ref() else {
                    return respond(());
                };
                let user_id = from.id.to_string();

                if !allow_from.is_empty() && !allow_from.contains(&user_id) {
                    warn!(
                        user_id,
                        chat_id = msg.chat.id.to_string(),
                        "Rejected message from user not in allowFrom list"
                    );
                    return respond(());
                }

                if let Some(text) = msg.text() {
                    let inbound = InboundMessage {
                        channel: CHANNEL.to_owned(),
                        chat_id: msg.chat.id.to_string(),
                        user_id,
                        user_name: from.first_name.clone(),
                        content: text.to_owned(),
                    };
                    if let Err(e) = bus.inbound_sender().send(inbound).await {
                        error!("Failed to send inbound message to bus: {}", e);
                    }
                }
                respond(())
            },
        );

        let allow_from = Arc::new(self.allow_from);
        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![self.bus, allow_from])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram transport stopped");
        Ok(())
    }
}
