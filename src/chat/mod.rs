//! Chat relay core
//!
//! This module owns the connection registry, the broadcast fan-out,
//! and the per-connection driver loop.

mod message;
mod registry;
mod relay;
mod server;

pub use message::{ChatMessage, OutboundFrame};
pub use registry::ConnectionRegistry;
pub use relay::BroadcastRelay;
pub use server::{ChatServer, CHAT_ENDPOINT};
