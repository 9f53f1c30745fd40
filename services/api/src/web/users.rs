//! services/api/src/web/users.rs
//!
//! REST handlers for user profiles: list, fetch, update (including the
//! current-password-gated password change), and delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use move_right_core::domain::User;
use move_right_core::ports::UserPatch;
use move_right_core::validation::validate_password;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::auth::{hash_password, verify_password};
use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// The public shape of a user profile. The password hash never leaves the server.
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    /// Formatted height, e.g. `5'11"`.
    pub height: String,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let height = user.formatted_height();
        Self {
            id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            age: user.age,
            height,
            weight: user.weight_lbs,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub feet: Option<i32>,
    pub inches: Option<i32>,
    pub weight: Option<f64>,
    /// Required when `new_password` is set.
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /users - List all users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let users = state.db.list_users().await.map_err(|e| {
        error!("Failed to list users: {:?}", e);
        port_error_response(e)
    })?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(response))
}

/// GET /users/{user_id} - Fetch a single user
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "The unique ID of the user.")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = state.db.get_user(user_id).await.map_err(port_error_response)?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/{user_id} - Update a user's profile (self or admin only)
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    request_body = UpdateUserRequest,
    params(("user_id" = Uuid, Path, description = "The unique ID of the user.")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid update"),
        (status = 401, description = "Current password incorrect"),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Extension(current_user_id): Extension<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    ensure_self_or_admin(&state, current_user_id, user_id).await?;

    // Handle password change if provided: verify the current password first.
    if let Some(new_password) = &req.new_password {
        let current_password = req.current_password.as_deref().ok_or((
            StatusCode::BAD_REQUEST,
            "Current password is required to change password".to_string(),
        ))?;

        validate_password(new_password)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

        let target = state.db.get_user(user_id).await.map_err(port_error_response)?;
        let creds = state
            .db
            .get_user_by_email(&target.email)
            .await
            .map_err(port_error_response)?;
        if !verify_password(current_password, &creds.hashed_password) {
            return Err((StatusCode::UNAUTHORIZED, "Current password is incorrect".to_string()));
        }

        let hashed = hash_password(new_password)?;
        state
            .db
            .update_user_password(user_id, &hashed)
            .await
            .map_err(port_error_response)?;
    }

    let patch = UserPatch {
        first_name: req.first_name,
        last_name: req.last_name,
        age: req.age,
        height_feet: req.feet,
        height_inches: req.inches,
        weight_lbs: req.weight,
    };

    let updated = state
        .db
        .update_user_profile(user_id, patch)
        .await
        .map_err(port_error_response)?;

    Ok(Json(UserResponse::from(updated)))
}

/// DELETE /users/{user_id} - Delete a user (self or admin only)
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = Uuid, Path, description = "The unique ID of the user.")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Extension(current_user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    ensure_self_or_admin(&state, current_user_id, user_id).await?;
    state.db.delete_user(user_id).await.map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Allows the operation when the caller is the target user or an admin.
async fn ensure_self_or_admin(
    state: &Arc<AppState>,
    current_user_id: Uuid,
    target_user_id: Uuid,
) -> Result<(), (StatusCode, String)> {
    if current_user_id == target_user_id {
        return Ok(());
    }
    let caller = state
        .db
        .get_user(current_user_id)
        .await
        .map_err(port_error_response)?;
    if caller.is_admin {
        Ok(())
    } else {
        Err((StatusCode::FORBIDDEN, "You can only manage your own profile".to_string()))
    }
}
