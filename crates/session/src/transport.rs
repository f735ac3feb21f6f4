//! Outbound delivery trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{ChatId, OutboundMessage};

use crate::error::EngineError;

/// Trait for delivering rendered messages to users.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one message to its chat.
    async fn send(&self, message: OutboundMessage) -> Result<(), EngineError>;
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<OutboundMessage>,
    fail: bool,
}

/// In-memory transport for testing.
///
/// Records every message it is asked to deliver, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<RwLock<RecordingState>>,
}

impl RecordingTransport {
    /// Creates a new recording transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the transport to refuse sends.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Returns every message sent so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns the messages sent to one chat.
    pub fn sent_to(&self, chat: ChatId) -> Vec<OutboundMessage> {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .filter(|m| m.chat_id == chat)
            .cloned()
            .collect()
    }

    /// Returns the most recent message sent to one chat.
    pub fn last_to(&self, chat: ChatId) -> Option<OutboundMessage> {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .rev()
            .find(|m| m.chat_id == chat)
            .cloned()
    }

    /// Returns the total number of messages sent.
    pub fn count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, message: OutboundMessage) -> Result<(), EngineError> {
        let mut state = self.state.write().unwrap();

        if state.fail {
            return Err(EngineError::Transport("send refused".to_string()));
        }

        state.sent.push(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(chat: i64, body: &str) -> OutboundMessage {
        OutboundMessage::text(ChatId::new(chat), body)
    }

    #[tokio::test]
    async fn test_records_in_order() {
        let transport = RecordingTransport::new();

        transport.send(text(1, "first")).await.unwrap();
        transport.send(text(2, "second")).await.unwrap();
        transport.send(text(1, "third")).await.unwrap();

        assert_eq!(transport.count(), 3);
        assert_eq!(transport.sent_to(ChatId::new(1)).len(), 2);
        let last = transport.last_to(ChatId::new(1)).unwrap();
        assert_eq!(last.text_content(), "third");
    }

    #[tokio::test]
    async fn test_set_fail_refuses_sends() {
        let transport = RecordingTransport::new();
        transport.set_fail(true);

        let result = transport.send(text(1, "lost")).await;
        assert!(result.is_err());
        assert_eq!(transport.count(), 0);

        transport.set_fail(false);
        transport.send(text(1, "kept")).await.unwrap();
        assert_eq!(transport.count(), 1);
    }
}
