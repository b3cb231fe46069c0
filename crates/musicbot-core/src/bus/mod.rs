//! Message bus between transports and the dialogue bridge.
//!
//! Transports push [`InboundMessage`]s into a bounded `tokio::sync::mpsc`
//! channel with a single consumer, so messages are handled one at a time
//! in arrival order. Replies travel back through a second channel and are
//! handed to the handler registered for their channel name.

pub mod events;

use events::{InboundMessage, OutboundMessage};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, warn};

/// How long a single reply delivery may take before it is abandoned.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers one reply on a channel.
type OutboundHandler = Arc<dyn Fn(OutboundMessage) -> BoxFuture<'static, ()> + Send + Sync>;

/// Channel name -> delivery handler, shared with the dispatch task.
pub type HandlerMap = Arc<RwLock<HashMap<String, OutboundHandler>>>;

pub struct MessageBus {
    inbound_tx: mpsc::Sender<InboundMessage>,
    outbound_tx: mpsc::Sender<OutboundMessage>,
    handlers: HandlerMap,
}

pub struct MessageBusReceivers {
    pub inbound_rx: mpsc::Receiver<InboundMessage>,
    pub outbound_rx: mpsc::Receiver<OutboundMessage>,
}

impl MessageBus {
    /// Create a bus whose channels each buffer `capacity` messages.
    pub fn new(capacity: usize) -> (Self, MessageBusReceivers) {
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(capacity);

        let bus = Self {
            inbound_tx,
            outbound_tx,
            handlers: Arc::new(RwLock::new(HashMap::new())),
        };
        (
            bus,
            MessageBusReceivers {
                inbound_rx,
                outbound_rx,
            },
        )
    }

    pub fn inbound_sender(&self) -> mpsc::Sender<InboundMessage> {
        self.inbound_tx.clone()
    }

    pub fn outbound_sender(&self) -> mpsc::Sender<OutboundMessage> {
        self.outbound_tx.clone()
    }

    pub fn handlers(&self) -> HandlerMap {
        Arc::clone(&self.handlers)
    }

    /// Register the delivery handler for `channel`, replacing any previous one.
    pub async fn on_outbound<F, Fut>(&self, channel: &str, deliver: F)
    where
        F: Fn(OutboundMessage) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let handler: OutboundHandler =
            Arc::new(move |msg| -> BoxFuture<'static, ()> { Box::pin(deliver(msg)) });
        if self
            .handlers
            .write()
            .await
            .insert(channel.to_string(), handler)
            .is_some()
        {
            warn!(channel, "Replaced outbound handler");
        }
    }
}

/// Deliver replies until every outbound sender is dropped.
///
/// Each reply is awaited before the next one starts, which keeps replies
/// to the same chat in order. Run it with `tokio::spawn`.
pub async fn dispatch_outbound(handlers: HandlerMap, mut outbound_rx: mpsc::Receiver<OutboundMessage>) {
    while let Some(msg) = outbound_rx.recv().await {
        let handler = handlers.read().await.get(&msg.channel).cloned();
        let Some(handler) = handler else {
            debug!(channel = msg.channel, "No handler for outbound message");
            continue;
        };
        let channel = msg.channel.clone();
        if tokio::time::timeout(DELIVERY_TIMEOUT, handler(msg)).await.is_err() {
            error!(channel, "Outbound delivery timed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inbound_send_receive() {
        let (bus, mut receivers) = MessageBus::new(16);
        bus.inbound_sender()
            .send(InboundMessage::local("hello"))
            .await
            .unwrap();

        let msg = receivers.inbound_rx.recv().await.unwrap();
        assert_eq!(msg.content, "hello");
        assert_eq!(msg.user_id, "local");
    }

    #[tokio::test]
    async fn test_dispatch_preserves_order() {
        let (bus, receivers) = MessageBus::new(16);
        let seen = Arc::new(RwLock::new(Vec::<String>::new()));

        let sink = Arc::clone(&seen);
        bus.on_outbound("test", move |msg| {
            let sink = Arc::clone(&sink);
            async move {
                sink.write().await.push(msg.content);
            }
        })
        .await;

        let dispatch = tokio::spawn(dispatch_outbound(bus.handlers(), receivers.outbound_rx));
        for text in ["one", "two", "three"] {
            bus.outbound_sender()
                .send(OutboundMessage::reply("test", "c1", text))
                .await
                .unwrap();
        }
        drop(bus);
        dispatch.await.unwrap();

        assert_eq!(*seen.read().await, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_unrouted_messages_are_dropped() {
        let (bus, receivers) = MessageBus::new(4);
        let dispatch = tokio::spawn(dispatch_outbound(bus.handlers(), receivers.outbound_rx));
        bus.outbound_sender()
            .send(OutboundMessage::reply("nowhere", "c1", "lost"))
            .await
            .unwrap();
        drop(bus);
        dispatch.await.unwrap();
    }
}
