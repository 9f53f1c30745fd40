//! services/api/src/web/reviews.rs
//!
//! REST handlers for app reviews. Reading is public; writing requires a
//! session, and each account may hold at most one review.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use move_right_core::domain::Review;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub title: String,
    pub comment: String,
    /// Rating between 0 and 5.
    pub rating: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub title: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub comment: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            title: review.title,
            comment: review.comment,
            rating: review.rating,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

fn validate_rating(rating: i32) -> Result<(), (StatusCode, String)> {
    if (0..=5).contains(&rating) {
        Ok(())
    } else {
        Err((StatusCode::BAD_REQUEST, "Rating must be between 0 and 5".to_string()))
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /reviews - List all reviews
#[utoipa::path(
    get,
    path = "/reviews",
    responses(
        (status = 200, description = "All reviews", body = [ReviewResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let reviews = state.db.list_reviews().await.map_err(|e| {
        error!("Failed to list reviews: {:?}", e);
        port_error_response(e)
    })?;
    let response: Vec<ReviewResponse> = reviews.into_iter().map(ReviewResponse::from).collect();
    Ok(Json(response))
}

/// GET /reviews/{review_id} - Fetch a single review
#[utoipa::path(
    get,
    path = "/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "The unique ID of the review.")),
    responses(
        (status = 200, description = "The review", body = ReviewResponse),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review_handler(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let review = state.db.get_review(review_id).await.map_err(port_error_response)?;
    Ok(Json(ReviewResponse::from(review)))
}

/// POST /reviews - Create the caller's review (one per account)
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid review"),
        (status = 401, description = "Login required"),
        (status = 409, description = "This account already has a review")
    )
)]
pub async fn create_review_handler(
    State(state): State<Arc<AppState>>,
    Extension(current_user_id): Extension<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.title.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please enter the review's title".to_string()));
    }
    if req.comment.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Please comment".to_string()));
    }
    validate_rating(req.rating)?;

    let review = state
        .db
        .create_review(current_user_id, &req.title, &req.comment, req.rating)
        .await
        .map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// PUT /reviews/{review_id} - Update the caller's own review
#[utoipa::path(
    put,
    path = "/reviews/{review_id}",
    request_body = UpdateReviewRequest,
    params(("review_id" = Uuid, Path, description = "The unique ID of the review.")),
    responses(
        (status = 200, description = "Updated review", body = ReviewResponse),
        (status = 400, description = "Invalid update"),
        (status = 401, description = "Login required"),
        (status = 403, description = "Not your review"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review_handler(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<Uuid>,
    Extension(current_user_id): Extension<Uuid>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let review = state.db.get_review(review_id).await.map_err(port_error_response)?;
    if review.user_id != current_user_id {
        return Err((StatusCode::FORBIDDEN, "You can only update your own reviews".to_string()));
    }

    if let Some(rating) = req.rating {
        validate_rating(rating)?;
    }

    let updated = state
        .db
        .update_review(review_id, req.title, req.comment, req.rating)
        .await
        .map_err(port_error_response)?;

    Ok(Json(ReviewResponse::from(updated)))
}

/// DELETE /reviews/{review_id} - Delete the caller's own review
#[utoipa::path(
    delete,
    path = "/reviews/{review_id}",
    params(("review_id" = Uuid, Path, description = "The unique ID of the review.")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Login required"),
        (status = 403, description = "Not your review"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review_handler(
    State(state): State<Arc<AppState>>,
    Path(review_id): Path<Uuid>,
    Extension(current_user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let review = state.db.get_review(review_id).await.map_err(port_error_response)?;
    if review.user_id != current_user_id {
        return Err((StatusCode::FORBIDDEN, "You can only delete your own reviews".to_string()));
    }

    state.db.delete_review(review_id).await.map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
