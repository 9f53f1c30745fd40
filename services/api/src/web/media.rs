//! services/api/src/web/media.rs
//!
//! The per-user media library: snapshot uploads, listing, and deletion.
//! Files land in the configured media directory; the database keeps the
//! library entries that point at them.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use move_right_core::domain::{Exercise, MediaItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, IntoParams)]
pub struct UploadParams {
    /// Exercise to tag the snapshot with.
    #[param(value_type = Option<String>)]
    pub exercise: Option<Exercise>,
}

#[derive(Serialize, ToSchema)]
pub struct MediaItemResponse {
    pub id: Uuid,
    pub file_name: String,
    #[schema(value_type = Option<String>)]
    pub exercise: Option<Exercise>,
    pub created_at: DateTime<Utc>,
}

impl From<MediaItem> for MediaItemResponse {
    fn from(item: MediaItem) -> Self {
        Self {
            id: item.id,
            file_name: item.file_name,
            exercise: item.exercise,
            created_at: item.created_at,
        }
    }
}

/// Builds the stored snapshot filename from its owner and capture time.
pub(crate) fn snapshot_file_name(user_id: Uuid, captured_at: DateTime<Utc>) -> String {
    format!("user_{}_{}.jpg", user_id, captured_at.format("%Y%m%d_%H%M%S"))
}

/// Writes snapshot bytes to the media directory and records the library entry.
pub(crate) async fn store_snapshot(
    state: &Arc<AppState>,
    user_id: Uuid,
    exercise: Option<Exercise>,
    data: &[u8],
) -> Result<MediaItem, (StatusCode, String)> {
    let file_name = snapshot_file_name(user_id, Utc::now());
    let path = state.config.media_dir.join(&file_name);

    let write_result = async {
        tokio::fs::create_dir_all(&state.config.media_dir).await?;
        tokio::fs::write(&path, data).await
    }
    .await;
    write_result.map_err(|e| {
        error!("Failed to write snapshot {}: {}", path.display(), e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to store snapshot".to_string())
    })?;

    state
        .db
        .add_media_item(user_id, &file_name, exercise)
        .await
        .map_err(port_error_response)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /media - Upload a snapshot into the caller's library.
///
/// Accepts a multipart/form-data request with a single image part.
#[utoipa::path(
    post,
    path = "/media",
    request_body(content_type = "multipart/form-data", description = "The snapshot to upload."),
    params(UploadParams),
    responses(
        (status = 201, description = "Snapshot stored", body = MediaItemResponse),
        (status = 400, description = "Bad request (e.g., missing file part)"),
        (status = 401, description = "Login required"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_media_handler(
    State(state): State<Arc<AppState>>,
    Extension(current_user_id): Extension<Uuid>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let data = if let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        field.bytes().await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read file bytes: {}", e),
            )
        })?
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    };

    if data.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Uploaded file is empty".to_string()));
    }

    let item = store_snapshot(&state, current_user_id, params.exercise, &data).await?;
    Ok((StatusCode::CREATED, Json(MediaItemResponse::from(item))))
}

/// GET /media - List the caller's media library, newest first
#[utoipa::path(
    get,
    path = "/media",
    responses(
        (status = 200, description = "The caller's library", body = [MediaItemResponse]),
        (status = 401, description = "Login required")
    )
)]
pub async fn list_media_handler(
    State(state): State<Arc<AppState>>,
    Extension(current_user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let items = state
        .db
        .list_media_items(current_user_id)
        .await
        .map_err(port_error_response)?;
    let response: Vec<MediaItemResponse> = items.into_iter().map(MediaItemResponse::from).collect();
    Ok(Json(response))
}

/// DELETE /media/{media_id} - Remove an item from the caller's library
#[utoipa::path(
    delete,
    path = "/media/{media_id}",
    params(("media_id" = Uuid, Path, description = "The unique ID of the media item.")),
    responses(
        (status = 204, description = "Media item deleted"),
        (status = 401, description = "Login required"),
        (status = 403, description = "Not your media item"),
        (status = 404, description = "Media item not found")
    )
)]
pub async fn delete_media_handler(
    State(state): State<Arc<AppState>>,
    Path(media_id): Path<Uuid>,
    Extension(current_user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let item = state.db.get_media_item(media_id).await.map_err(port_error_response)?;
    if item.user_id != current_user_id {
        return Err((StatusCode::FORBIDDEN, "You can only delete your own media".to_string()));
    }

    state.db.delete_media_item(media_id).await.map_err(port_error_response)?;

    // Remove the file too; a missing file is not worth failing the request over.
    let path = state.config.media_dir.join(&item.file_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Failed to remove media file {}: {}", path.display(), e);
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_names_carry_owner_and_timestamp() {
        let user_id = Uuid::nil();
        let captured_at = Utc.with_ymd_and_hms(2026, 8, 8, 13, 45, 9).unwrap();
        assert_eq!(
            snapshot_file_name(user_id, captured_at),
            format!("user_{}_20260808_134509.jpg", user_id)
        );
    }
}
