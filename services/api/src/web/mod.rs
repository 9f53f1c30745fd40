pub mod auth;
pub mod capture;
pub mod media;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod results;
pub mod reviews;
pub mod state;
pub mod users;
pub mod ws_handler;

use axum::http::StatusCode;
use move_right_core::ports::PortError;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use middleware::require_auth;
pub use ws_handler::ws_handler;

/// Maps a port error to the HTTP response the REST handlers return.
pub(crate) fn port_error_response(error: PortError) -> (StatusCode, String) {
    match error {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        PortError::Conflict(message) => (StatusCode::CONFLICT, message),
        PortError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        PortError::Unexpected(message) => {
            tracing::error!("Unexpected port error: {}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
        }
    }
}
