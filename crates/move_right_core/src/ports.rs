//! crates/move_right_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or
//! classifier model files.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Exercise, FormAssessment, MediaItem, Review, User, UserCredentials, WorkoutResult,
};
use crate::pose::JointAngles;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The fields a signup supplies for a new account. The password arrives
/// already hashed; plaintext never crosses this port.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hashed_password: String,
    pub age: i32,
    pub height_feet: i32,
    pub height_inches: i32,
    pub weight_lbs: f64,
}

/// A partial profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub height_feet: Option<i32>,
    pub height_inches: Option<i32>,
    pub weight_lbs: Option<f64>,
}

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user(&self, user_id: Uuid) -> PortResult<User>;

    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn update_user_profile(&self, user_id: Uuid, patch: UserPatch) -> PortResult<User>;

    async fn update_user_password(&self, user_id: Uuid, hashed_password: &str) -> PortResult<()>;

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a session token to its user. Expired sessions are rejected
    /// (and removed) as if they never existed.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Reviews ---
    /// Creates a review. Fails with `Conflict` if the account already has one.
    async fn create_review(
        &self,
        user_id: Uuid,
        title: &str,
        comment: &str,
        rating: i32,
    ) -> PortResult<Review>;

    async fn get_review(&self, review_id: Uuid) -> PortResult<Review>;

    async fn list_reviews(&self) -> PortResult<Vec<Review>>;

    async fn update_review(
        &self,
        review_id: Uuid,
        title: Option<String>,
        comment: Option<String>,
        rating: Option<i32>,
    ) -> PortResult<Review>;

    async fn delete_review(&self, review_id: Uuid) -> PortResult<()>;

    // --- Workout Results ---
    async fn save_workout_result(
        &self,
        user_id: Uuid,
        exercise: Exercise,
        total_reps: i32,
        average_form_score: f64,
        session_duration_secs: i32,
        rep_details: &[crate::domain::RepDetail],
    ) -> PortResult<WorkoutResult>;

    async fn list_workout_results(
        &self,
        user_id: Uuid,
        exercise: Option<Exercise>,
    ) -> PortResult<Vec<WorkoutResult>>;

    // --- Media Library ---
    async fn add_media_item(
        &self,
        user_id: Uuid,
        file_name: &str,
        exercise: Option<Exercise>,
    ) -> PortResult<MediaItem>;

    async fn list_media_items(&self, user_id: Uuid) -> PortResult<Vec<MediaItem>>;

    async fn get_media_item(&self, media_id: Uuid) -> PortResult<MediaItem>;

    async fn delete_media_item(&self, media_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait FormClassifierService: Send + Sync {
    /// Classifies one frame's joint angles as good or bad form for the
    /// given exercise.
    async fn classify(&self, exercise: Exercise, angles: &JointAngles)
        -> PortResult<FormAssessment>;

    /// The exercises the loaded model can classify.
    fn supported_exercises(&self) -> Vec<Exercise>;
}
