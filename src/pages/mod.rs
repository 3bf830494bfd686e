//! Static page endpoints.
//!
//! These sit outside the relay core: the landing page and the chat-room
//! page are plain HTML responses whose scripts talk to the WebSocket
//! endpoint.

use actix_web::{http::header::ContentType, HttpResponse};

const INDEX_HTML: &str = include_str!("index.html");
const ROOM_HTML: &str = include_str!("room.html");

/// Landing page with a link into the chat room.
pub async fn landing() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

/// Chat-room page; its script opens the WebSocket connection.
pub async fn chat_room() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(ROOM_HTML)
}
