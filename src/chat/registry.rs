use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;
use crate::chat::OutboundFrame;
use crate::error::{AppError, ChatError};
use tracing::{error, info};

/// Tracks every live connection, keyed by the id assigned at connect time.
/// An entry is present exactly while the connection is eligible to receive
/// broadcasts. Insert/remove/iterate all go through one RwLock, so the
/// per-connection tasks can run on a multi-threaded executor safely.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<Uuid, mpsc::UnboundedSender<Message>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a freshly accepted connection: assigns an unused id, sends
    /// the private welcome frame, then inserts the entry. If the welcome
    /// cannot be delivered the connection is never registered.
    pub async fn connect(&self, sender: mpsc::UnboundedSender<Message>) -> Result<Uuid, AppError> {
        let welcome = serde_json::to_string(&OutboundFrame::welcome())?;
        sender
            .send(Message::Text(welcome))
            .map_err(|e| ChatError::SendFailed(format!("welcome frame: {}", e)))?;

        let mut connections = self.connections.write().await;
        let mut id = Uuid::new_v4();
        while connections.contains_key(&id) {
            id = Uuid::new_v4();
        }
        connections.insert(id, sender);
        info!("Registered connection {}", id);
        Ok(id)
    }

    /// Deregisters a connection at end of life. Called exactly once per
    /// connection by its driver loop; a miss is a logic error.
    pub async fn disconnect(&self, id: Uuid) -> Result<Uuid, AppError> {
        let removed = self.connections.write().await.remove(&id).is_some();
        if removed {
            info!("Removed connection {} from registry", id);
            Ok(id)
        } else {
            error!("Disconnect for unregistered connection {}", id);
            Err(ChatError::UnknownConnection.into())
        }
    }

    /// Drops a stale entry discovered during broadcast. Unlike `disconnect`,
    /// the entry may already be gone if the driver loop won the race.
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.connections.write().await.remove(id).is_some();
        if removed {
            info!("Removed stale connection {}", id);
        }
        removed
    }

    /// Point-in-time copy of the registry for fan-out. Connections added or
    /// removed after this call are not reflected in the returned set.
    pub async fn snapshot(&self) -> Vec<(Uuid, mpsc::UnboundedSender<Message>)> {
        self.connections
            .read()
            .await
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn contains(&self, id: &Uuid) -> bool {
        self.connections.read().await.contains_key(id)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
