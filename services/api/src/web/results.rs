//! services/api/src/web/results.rs
//!
//! REST handlers for saved workout results. Both the live-capture channel
//! and this endpoint persist workouts; this one also serves the history
//! page, optionally filtered by exercise type.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use move_right_core::domain::{Exercise, RepDetail, WorkoutResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SaveWorkoutRequest {
    #[schema(value_type = String, example = "pushup")]
    pub exercise: Exercise,
    pub total_reps: i32,
    pub average_form_score: f64,
    pub session_duration_secs: i32,
    #[schema(value_type = Vec<Object>)]
    pub rep_details: Vec<RepDetail>,
}

#[derive(Deserialize, IntoParams)]
pub struct WorkoutFilter {
    /// Restrict the listing to one exercise type.
    #[param(value_type = Option<String>)]
    pub exercise: Option<Exercise>,
}

#[derive(Serialize, ToSchema)]
pub struct WorkoutResultResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = String)]
    pub exercise: Exercise,
    pub total_reps: i32,
    pub average_form_score: f64,
    pub session_duration_secs: i32,
    #[schema(value_type = Vec<Object>)]
    pub rep_details: Vec<RepDetail>,
    pub created_at: DateTime<Utc>,
}

impl From<WorkoutResult> for WorkoutResultResponse {
    fn from(result: WorkoutResult) -> Self {
        Self {
            id: result.id,
            user_id: result.user_id,
            exercise: result.exercise,
            total_reps: result.total_reps,
            average_form_score: result.average_form_score,
            session_duration_secs: result.session_duration_secs,
            rep_details: result.rep_details,
            created_at: result.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /workout-results - Save a completed workout for the caller
#[utoipa::path(
    post,
    path = "/workout-results",
    request_body = SaveWorkoutRequest,
    responses(
        (status = 201, description = "Workout saved", body = WorkoutResultResponse),
        (status = 400, description = "Invalid workout data"),
        (status = 401, description = "Login required")
    )
)]
pub async fn save_workout_handler(
    State(state): State<Arc<AppState>>,
    Extension(current_user_id): Extension<Uuid>,
    Json(req): Json<SaveWorkoutRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.total_reps < 0 || req.session_duration_secs < 0 {
        return Err((StatusCode::BAD_REQUEST, "Workout numbers cannot be negative".to_string()));
    }
    if !(0.0..=1.0).contains(&req.average_form_score) {
        return Err((
            StatusCode::BAD_REQUEST,
            "Average form score must be between 0 and 1".to_string(),
        ));
    }

    let result = state
        .db
        .save_workout_result(
            current_user_id,
            req.exercise,
            req.total_reps,
            req.average_form_score,
            req.session_duration_secs,
            &req.rep_details,
        )
        .await
        .map_err(|e| {
            error!("Failed to save workout: {:?}", e);
            port_error_response(e)
        })?;

    Ok((StatusCode::CREATED, Json(WorkoutResultResponse::from(result))))
}

/// GET /workout-results - List the caller's workouts, newest first
#[utoipa::path(
    get,
    path = "/workout-results",
    params(WorkoutFilter),
    responses(
        (status = 200, description = "The caller's workouts", body = [WorkoutResultResponse]),
        (status = 401, description = "Login required")
    )
)]
pub async fn list_workouts_handler(
    State(state): State<Arc<AppState>>,
    Extension(current_user_id): Extension<Uuid>,
    Query(filter): Query<WorkoutFilter>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let results = state
        .db
        .list_workout_results(current_user_id, filter.exercise)
        .await
        .map_err(|e| {
            error!("Failed to list workouts: {:?}", e);
            port_error_response(e)
        })?;

    let response: Vec<WorkoutResultResponse> =
        results.into_iter().map(WorkoutResultResponse::from).collect();
    Ok(Json(response))
}
