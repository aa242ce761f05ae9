//! Greeting and health check handlers

use stream_core::Message;

/// GET /
///
/// The greeting is carried by a message value like any other text.
pub async fn greeting() -> String {
    Message::anonymous("Hello World!").text().to_string()
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
