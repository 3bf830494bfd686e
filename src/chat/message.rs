use serde::{Deserialize, Serialize};

/// Inbound payload from a client. The username is sender-supplied display
/// text; there is no server-side identity binding.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub username: String,
    pub message: String,
}

/// Frame delivered to each recipient of a broadcast. `is_me` is true only on
/// the frame going back to the originating connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundFrame {
    #[serde(rename = "isMe")]
    pub is_me: bool,
    pub data: String,
    pub username: String,
}

impl OutboundFrame {
    /// Private acknowledgment sent once, right after a connection registers.
    pub fn welcome() -> Self {
        Self {
            is_me: true,
            data: "Have joined!!".to_string(),
            username: "You".to_string(),
        }
    }

    pub fn new(is_me: bool, inbound: &ChatMessage) -> Self {
        Self {
            is_me,
            data: inbound.message.clone(),
            username: inbound.username.clone(),
        }
    }
}
