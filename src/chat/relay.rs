use std::sync::Arc;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;
use crate::chat::{ChatMessage, ConnectionRegistry, OutboundFrame};
use crate::error::{AppError, ChatError};
use tracing::{error, warn};

/// Turns one inbound message into one outbound frame per registered
/// connection, marking the frame sent back to the originator.
pub struct BroadcastRelay {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastRelay {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Parses `raw` and fans it out to every current connection. A malformed
    /// payload is returned to the caller without sending anything; the
    /// driver loop logs it and keeps the connection alive. A recipient whose
    /// channel is closed never aborts the remaining sends; its entry is
    /// removed from the registry after the fan-out.
    pub async fn broadcast(&self, sender_id: Uuid, raw: &str) -> Result<(), AppError> {
        let inbound: ChatMessage = serde_json::from_str(raw).map_err(|e| {
            warn!("Dropping malformed payload from {}: {}", sender_id, e);
            ChatError::MalformedPayload(e.to_string())
        })?;

        let mut stale = Vec::new();
        for (id, sender) in self.registry.snapshot().await {
            let frame = OutboundFrame::new(id == sender_id, &inbound);
            let text = serde_json::to_string(&frame)?;
            if sender.send(Message::Text(text)).is_err() {
                error!("Delivery failed: {}", ChatError::StaleRecipient(id));
                stale.push(id);
            }
        }

        for id in &stale {
            self.registry.remove(id).await;
        }

        Ok(())
    }
}
