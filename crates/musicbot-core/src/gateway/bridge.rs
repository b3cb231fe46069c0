//! Bridge from the message bus to the dialogue engine.
//!
//! Each inbound message is answered on the channel and chat it came from.
//! Replies are published as the engine produces them.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::bus::events::{InboundMessage, OutboundMessage};
use crate::dialogue::{DialogueEngine, ReplySink};

/// Sent when a message could not be handled.
const APOLOGY: &str = "Sorry, something went wrong on my side. Could you try that again?";

/// Publishes engine replies as outbound messages for one inbound message.
struct ChatSink<'a> {
    msg: &'a InboundMessage,
    outbound: &'a mpsc::Sender<OutboundMessage>,
    closed: bool,
}

#[async_trait]
impl<'a> ReplySink for ChatSink<'a> {
    async fn send(&mut self, reply: String) {
        if self.closed {
            return;
        }
        if self.outbound.send(OutboundMessage::answering(self.msg, reply)).await.is_err() {
            self.closed = true;
        }
    }
}

/// Connects the inbound side of the message bus to the dialogue engine.
///
/// The bridge is the only consumer of inbound messages, so the engine sees
/// them strictly one at a time, in arrival order. A failure on one message
/// is logged and answered with an apology; the loop keeps going.
pub struct DialogueBridge {
    engine: DialogueEngine,
    outbound: mpsc::Sender<OutboundMessage>,
    cancel: CancellationToken,
}

impl DialogueBridge {
    pub fn new(
        engine: DialogueEngine,
        outbound: mpsc::Sender<OutboundMessage>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            engine,
            outbound,
            cancel,
        }
    }

    /// Answer a single inbound message. Returns `false` once the outbound
    /// channel has closed.
    pub async fn handle(&mut self, msg: &InboundMessage) -> bool {
        let mut sink = ChatSink {
            msg,
            outbound: &self.outbound,
            closed: false,
        };

        if let Err(e) = self
            .engine
            .respond(&msg.content, &msg.user_id, &msg.user_name, &mut sink)
            .await
        {
            error!(
                channel = msg.channel,
                chat_id = msg.chat_id,
                error = %e,
                "Failed to handle message"
            );
            sink.send(APOLOGY.to_owned()).await;
        }
        !sink.closed
    }

    /// Run until the inbound channel closes or the bridge is cancelled.
    pub async fn run(mut self, mut inbound_rx: mpsc::Receiver<InboundMessage>) -> anyhow::Result<()> {
        info!("Dialogue bridge started, waiting for inbound messages...");

        loop {
            let msg = tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Dialogue bridge cancelled");
                    break;
                }
                msg = inbound_rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };

            debug!(
                channel = msg.channel,
                chat_id = msg.chat_id,
                user_id = msg.user_id,
                "Bridge received message"
            );

            if !self.handle(&msg).await {
                error!("Outbound channel closed, stopping bridge");
                return Ok(());
            }
        }

        info!("Dialogue bridge shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::recommend::Recommender;
    use crate::catalog::testing::FakeCatalog;
    use crate::dialogue::classifier::Classifier;
    use crate::dialogue::entities::EntityRecognizer;
    use crate::dialogue::memory::UserMemory;
    use crate::dialogue::phrases::PhraseBank;
    use crate::nlp::lexicon::LexiconAnnotator;

    fn engine() -> DialogueEngine {
        let catalog = FakeCatalog::new().with_artist("Queen", &[("A", 3)]);
        DialogueEngine::new(
            Box::new(LexiconAnnotator::new()),
            Classifier::new(EntityRecognizer::new(["Queen"])),
            Recommender::new(Arc::new(catalog), 10, 10),
            PhraseBank::seeded(3),
            UserMemory::new(),
        )
    }

    fn message(chat: &str, content: &str) -> InboundMessage {
        InboundMessage {
            channel: "telegram".into(),
            chat_id: chat.into(),
            user_id: "42".into(),
            user_name: "Ada".into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let (in_tx, in_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let bridge = DialogueBridge::new(engine(), out_tx, CancellationToken::new());

        in_tx.send(message("c1", "  ")).await.unwrap();
        in_tx.send(message("c2", "I like Queen")).await.unwrap();
        drop(in_tx);
        bridge.run(in_rx).await.unwrap();

        let mut replies = Vec::new();
        while let Some(r) = out_rx.recv().await {
            replies.push(r);
        }
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].chat_id, "c1");
        assert_eq!(replies[0].content, APOLOGY);
        assert_eq!(replies[1].chat_id, "c2");
        assert!(replies[2].content.contains(" - A\n"));
    }

    #[tokio::test]
    async fn test_acknowledgement_precedes_apology_on_catalog_failure() {
        let engine = DialogueEngine::new(
            Box::new(LexiconAnnotator::new()),
            Classifier::new(EntityRecognizer::new(["Queen"])),
            Recommender::new(Arc::new(FakeCatalog::failing()), 10, 10),
            PhraseBank::seeded(3),
            UserMemory::new(),
        );
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let mut bridge = DialogueBridge::new(engine, out_tx, CancellationToken::new());

        assert!(bridge.handle(&message("c1", "I love Queen")).await);
        drop(bridge);

        let mut replies = Vec::new();
        while let Some(r) = out_rx.recv().await {
            replies.push(r.content);
        }
        assert_eq!(replies.len(), 2);
        assert!(replies[0].ends_with("Queen..."));
        assert_eq!(replies[1], APOLOGY);
    }

    #[tokio::test]
    async fn test_closed_outbound_stops_handling() {
        let (out_tx, out_rx) = mpsc::channel(8);
        drop(out_rx);
        let mut bridge = DialogueBridge::new(engine(), out_tx, CancellationToken::new());
        assert!(!bridge.handle(&message("c1", "hello")).await);
    }

    #[tokio::test]
    async fn test_cancel_stops_bridge() {
        let (_in_tx, in_rx) = mpsc::channel::<InboundMessage>(1);
        let (out_tx, _out_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let bridge = DialogueBridge::new(engine(), out_tx, cancel.clone());

        cancel.cancel();
        bridge.run(in_rx).await.unwrap();
    }
}
