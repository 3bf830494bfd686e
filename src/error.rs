use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Chat error: {0}")]
    ChatError(#[from] ChatError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

// Implement conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

// Add conversion from std::io::Error
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Outbound frames serialize from plain structs; a failure here is a bug, not bad input
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Implement actix_web::ResponseError for AppError
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();
        let response = json!({
            "error": {
                "status": status.as_u16(),
                "message": message
            }
        });
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ChatError(ChatError::MalformedPayload(_)) => StatusCode::BAD_REQUEST,
            AppError::ChatError(ChatError::UnknownConnection) => StatusCode::NOT_FOUND,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("WebSocket handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Malformed chat payload: {0}")]
    MalformedPayload(String),

    #[error("Stale recipient {0}")]
    StaleRecipient(Uuid),

    #[error("Connection not registered")]
    UnknownConnection,

    #[error("Message sending failed: {0}")]
    SendFailed(String),
}
