//! Outbound delivery for the runnable service.

use async_trait::async_trait;
use common::{MessageBody, OutboundMessage};
use session::{EngineError, Transport};

/// Delivery sink that writes outbound messages to the log.
///
/// The chat platform itself is out of scope here; a deployment swaps this
/// for an adapter that calls the platform's send API.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl LogTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, message: OutboundMessage) -> Result<(), EngineError> {
        metrics::counter!("messages_delivered_total").increment(1);
        match &message.body {
            MessageBody::Text { text } => {
                tracing::info!(chat_id = %message.chat_id, text = %text, "delivering message");
            }
            MessageBody::Photo { image, caption } => {
                tracing::info!(
                    chat_id = %message.chat_id,
                    image = image.as_str(),
                    caption = %caption,
                    "delivering photo"
                );
            }
        }
        Ok(())
    }
}
