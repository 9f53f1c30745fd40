//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and message loop for a live-capture
//! WebSocket connection. The client streams pose landmark frames up; the
//! server answers each with its analysis and persists finished workouts.

use crate::web::{
    capture::{analyze_frame, finalize_workout},
    media::store_snapshot,
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, CaptureState},
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use tracing::{error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>, // from auth middleware
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, user_id))
}

/// Serializes and sends one server message. Returns Err when the client is gone.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).unwrap();
    sender.send(Message::Text(json.into())).await
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, user_id: Uuid) {
    info!("New live-capture connection for user: {}", user_id);

    let (mut sender, mut receiver) = socket.split();

    // --- 1. Initialization Phase ---
    // The first message must be Init so we know which exercise to track.
    let mut capture = if let Some(Ok(Message::Text(init_json))) = receiver.next().await {
        match serde_json::from_str::<ClientMessage>(&init_json) {
            Ok(ClientMessage::Init { exercise }) => {
                info!("Starting {} capture for user {}", exercise, user_id);
                let init_msg = ServerMessage::SessionInitialized { exercise };
                if send_message(&mut sender, &init_msg).await.is_err() {
                    error!("Failed to send session initialized message.");
                    return;
                }
                CaptureState::new(user_id, exercise)
            }
            _ => {
                error!("First message was not a valid Init message.");
                let err_msg = ServerMessage::Error {
                    message: "First message must be init".to_string(),
                };
                let _ = send_message(&mut sender, &err_msg).await;
                return;
            }
        }
    } else {
        error!("Client disconnected before sending Init message.");
        return;
    };

    // --- 2. Main Message Loop ---
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if handle_text_message(
                        text.to_string(),
                        &app_state,
                        &mut capture,
                        &mut sender,
                    )
                    .await
                    .is_err()
                    {
                        // The send side is gone; nothing left to do.
                        break;
                    }
                }
                Message::Binary(data) => {
                    // Binary frames are JPEG snapshots for the media library.
                    let exercise = capture.exercise;
                    match store_snapshot(&app_state, user_id, Some(exercise), &data).await {
                        Ok(item) => {
                            let saved = ServerMessage::SnapshotSaved {
                                media_id: item.id,
                                file_name: item.file_name,
                            };
                            if send_message(&mut sender, &saved).await.is_err() {
                                break;
                            }
                        }
                        Err((_, message)) => {
                            error!("Failed to store snapshot for user {}: {}", user_id, message);
                            let err_msg = ServerMessage::Error { message };
                            if send_message(&mut sender, &err_msg).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    // --- 3. Cleanup ---
    // An unfinished workout is dropped with the connection; only an explicit
    // end_workout persists anything.
    if capture.tracker.frames_seen() > 0 {
        info!(
            "Discarding unfinished workout for user {} ({} frames observed)",
            user_id,
            capture.tracker.frames_seen()
        );
    }
    info!("Live-capture connection closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
///
/// Returns Err only when the WebSocket send side has failed.
async fn handle_text_message(
    text: String,
    app_state: &Arc<AppState>,
    capture: &mut CaptureState,
    sender: &mut SplitSink<WebSocket, Message>,
) -> Result<(), axum::Error> {
    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(client_msg) => match client_msg {
            ClientMessage::Frame { landmarks } => {
                match analyze_frame(app_state, capture, &landmarks).await {
                    Ok(outcome) => {
                        send_message(sender, &outcome.analysis).await?;
                        if let Some(rep) = outcome.completed_rep {
                            let rep_msg = ServerMessage::RepCompleted {
                                rep_number: rep.rep_number,
                                form_score: rep.form_score,
                            };
                            send_message(sender, &rep_msg).await?;
                        }
                    }
                    Err(e) => {
                        // A dropped or partial frame is routine; report and move on.
                        warn!("Frame analysis failed: {:?}", e);
                        let err_msg = ServerMessage::Error { message: e.to_string() };
                        send_message(sender, &err_msg).await?;
                    }
                }
            }
            ClientMessage::EndWorkout => match finalize_workout(app_state, capture).await {
                Ok(Some(saved_msg)) => {
                    send_message(sender, &saved_msg).await?;
                }
                Ok(None) => {
                    let err_msg = ServerMessage::Error {
                        message: "No frames observed; nothing to save".to_string(),
                    };
                    send_message(sender, &err_msg).await?;
                }
                Err(e) => {
                    error!("Failed to finalize workout: {:?}", e);
                    let err_msg = ServerMessage::Error {
                        message: "Failed to save workout".to_string(),
                    };
                    send_message(sender, &err_msg).await?;
                }
            },
            ClientMessage::Init { .. } => {
                warn!("Received subsequent Init message, which is ignored.");
            }
        },
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
        }
    }
    Ok(())
}
