//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification. The REST handlers
//! themselves live in the per-resource modules (auth, users, reviews,
//! results, media).

use utoipa::OpenApi;

use crate::web::{auth, media, results, reviews, users};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        reviews::list_reviews_handler,
        reviews::get_review_handler,
        reviews::create_review_handler,
        reviews::update_review_handler,
        reviews::delete_review_handler,
        results::save_workout_handler,
        results::list_workouts_handler,
        media::upload_media_handler,
        media::list_media_handler,
        media::delete_media_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            users::UserResponse,
            users::UpdateUserRequest,
            reviews::CreateReviewRequest,
            reviews::UpdateReviewRequest,
            reviews::ReviewResponse,
            results::SaveWorkoutRequest,
            results::WorkoutResultResponse,
            media::MediaItemResponse,
        )
    ),
    tags(
        (name = "Move Right API", description = "Fitness form correction API: accounts, reviews, workout results, media, and the live-capture channel.")
    )
)]
pub struct ApiDoc;
