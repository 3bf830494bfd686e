pub mod chat;
pub mod config;
pub mod error;
pub mod pages;

use std::sync::Arc;
use actix_web::{web, HttpResponse};

pub use error::{AppError, ChatError};
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use chat::{BroadcastRelay, ChatServer, ConnectionRegistry};

/// Health check endpoint handler
/// Returns a JSON response with server status, timestamp and live connection count
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let connections = state.chat.registry().connection_count().await;

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "connections": connections,
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub chat: Arc<ChatServer>,
}

impl AppState {
    pub fn new(config: Settings) -> Self {
        Self {
            config: Arc::new(config),
            chat: Arc::new(ChatServer::new()),
        }
    }
}
