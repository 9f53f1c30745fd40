//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use move_right_core::domain::{
    AuthSession, Exercise, MediaItem, RepDetail, Review, User, UserCredentials, WorkoutResult,
};
use move_right_core::ports::{DatabaseService, NewUser, PortError, PortResult, UserPatch};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps an insert error, surfacing unique-key violations as conflicts.
fn map_insert_error(e: sqlx::Error, conflict_message: &str) -> PortError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PortError::Conflict(conflict_message.to_string())
        }
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn parse_exercise(raw: &str) -> PortResult<Exercise> {
    raw.parse::<Exercise>().map_err(PortError::Unexpected)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    age: i32,
    height_feet: i32,
    height_inches: i32,
    weight_lbs: f64,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            age: self.age,
            height_feet: self.height_feet,
            height_inches: self.height_inches,
            weight_lbs: self.weight_lbs,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "user_id, first_name, last_name, email, age, height_feet, \
                            height_inches, weight_lbs, is_admin, created_at, updated_at";

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    id: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}
impl AuthSessionRecord {
    fn to_domain(self) -> AuthSession {
        AuthSession {
            id: self.id,
            user_id: self.user_id,
            expires_at: self.expires_at,
        }
    }
}

#[derive(FromRow)]
struct ReviewRecord {
    id: Uuid,
    user_id: Uuid,
    title: String,
    comment: String,
    rating: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ReviewRecord {
    fn to_domain(self) -> Review {
        Review {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            comment: self.comment,
            rating: self.rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct WorkoutResultRecord {
    id: Uuid,
    user_id: Uuid,
    exercise: String,
    total_reps: i32,
    average_form_score: f64,
    session_duration_secs: i32,
    rep_details: Json<Vec<RepDetail>>,
    created_at: DateTime<Utc>,
}
impl WorkoutResultRecord {
    fn to_domain(self) -> PortResult<WorkoutResult> {
        Ok(WorkoutResult {
            id: self.id,
            user_id: self.user_id,
            exercise: parse_exercise(&self.exercise)?,
            total_reps: self.total_reps,
            average_form_score: self.average_form_score,
            session_duration_secs: self.session_duration_secs,
            rep_details: self.rep_details.0,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct MediaItemRecord {
    id: Uuid,
    user_id: Uuid,
    file_name: String,
    exercise: Option<String>,
    created_at: DateTime<Utc>,
}
impl MediaItemRecord {
    fn to_domain(self) -> PortResult<MediaItem> {
        let exercise = match self.exercise {
            Some(raw) => Some(parse_exercise(&raw)?),
            None => None,
        };
        Ok(MediaItem {
            id: self.id,
            user_id: self.user_id,
            file_name: self.file_name,
            exercise,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let sql = format!(
            "INSERT INTO users (user_id, first_name, last_name, email, hashed_password, age, \
             height_feet, height_inches, weight_lbs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {USER_COLUMNS}"
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(new_user.email.to_lowercase())
            .bind(&new_user.hashed_password)
            .bind(new_user.age)
            .bind(new_user.height_feet)
            .bind(new_user.height_inches)
            .bind(new_user.weight_lbs)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, "An account with this email already exists"))?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("User {} not found", user_id))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn list_users(&self) -> PortResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        let records = sqlx::query_as::<_, UserRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email.to_lowercase())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("No account for email {}", email))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn update_user_profile(&self, user_id: Uuid, patch: UserPatch) -> PortResult<User> {
        let sql = format!(
            "UPDATE users SET \
             first_name = COALESCE($2, first_name), \
             last_name = COALESCE($3, last_name), \
             age = COALESCE($4, age), \
             height_feet = COALESCE($5, height_feet), \
             height_inches = COALESCE($6, height_inches), \
             weight_lbs = COALESCE($7, weight_lbs), \
             updated_at = now() \
             WHERE user_id = $1 RETURNING {USER_COLUMNS}"
        );
        let record = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(user_id)
            .bind(patch.first_name)
            .bind(patch.last_name)
            .bind(patch.age)
            .bind(patch.height_feet)
            .bind(patch.height_inches)
            .bind(patch.weight_lbs)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => {
                    PortError::NotFound(format!("User {} not found", user_id))
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn update_user_password(&self, user_id: Uuid, hashed_password: &str) -> PortResult<()> {
        let result =
            sqlx::query("UPDATE users SET hashed_password = $2, updated_at = now() WHERE user_id = $1")
                .bind(user_id)
                .bind(hashed_password)
                .execute(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT id, user_id, expires_at FROM auth_sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => PortError::Unexpected(e.to_string()),
        })?;

        let session = record.to_domain();
        if session.is_expired(Utc::now()) {
            // Expired rows are removed on sight so the table stays small.
            self.delete_auth_session(session_id).await?;
            return Err(PortError::Unauthorized);
        }
        Ok(session.user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn create_review(
        &self,
        user_id: Uuid,
        title: &str,
        comment: &str,
        rating: i32,
    ) -> PortResult<Review> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            "INSERT INTO reviews (id, user_id, title, comment, rating) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, user_id, title, comment, rating, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(comment)
        .bind(rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "This account already has a review"))?;
        Ok(record.to_domain())
    }

    async fn get_review(&self, review_id: Uuid) -> PortResult<Review> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            "SELECT id, user_id, title, comment, rating, created_at, updated_at \
             FROM reviews WHERE id = $1",
        )
        .bind(review_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Review {} not found", review_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn list_reviews(&self) -> PortResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            "SELECT id, user_id, title, comment, rating, created_at, updated_at \
             FROM reviews ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_review(
        &self,
        review_id: Uuid,
        title: Option<String>,
        comment: Option<String>,
        rating: Option<i32>,
    ) -> PortResult<Review> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            "UPDATE reviews SET \
             title = COALESCE($2, title), \
             comment = COALESCE($3, comment), \
             rating = COALESCE($4, rating), \
             updated_at = now() \
             WHERE id = $1 \
             RETURNING id, user_id, title, comment, rating, created_at, updated_at",
        )
        .bind(review_id)
        .bind(title)
        .bind(comment)
        .bind(rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Review {} not found", review_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_review(&self, review_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Review {} not found", review_id)));
        }
        Ok(())
    }

    async fn save_workout_result(
        &self,
        user_id: Uuid,
        exercise: Exercise,
        total_reps: i32,
        average_form_score: f64,
        session_duration_secs: i32,
        rep_details: &[RepDetail],
    ) -> PortResult<WorkoutResult> {
        let record = sqlx::query_as::<_, WorkoutResultRecord>(
            "INSERT INTO workout_results \
             (id, user_id, exercise, total_reps, average_form_score, session_duration_secs, rep_details) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, exercise, total_reps, average_form_score, \
                       session_duration_secs, rep_details, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(exercise.as_str())
        .bind(total_reps)
        .bind(average_form_score)
        .bind(session_duration_secs)
        .bind(Json(rep_details.to_vec()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        record.to_domain()
    }

    async fn list_workout_results(
        &self,
        user_id: Uuid,
        exercise: Option<Exercise>,
    ) -> PortResult<Vec<WorkoutResult>> {
        let records = match exercise {
            Some(exercise) => {
                sqlx::query_as::<_, WorkoutResultRecord>(
                    "SELECT id, user_id, exercise, total_reps, average_form_score, \
                            session_duration_secs, rep_details, created_at \
                     FROM workout_results WHERE user_id = $1 AND exercise = $2 \
                     ORDER BY created_at DESC",
                )
                .bind(user_id)
                .bind(exercise.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, WorkoutResultRecord>(
                    "SELECT id, user_id, exercise, total_reps, average_form_score, \
                            session_duration_secs, rep_details, created_at \
                     FROM workout_results WHERE user_id = $1 ORDER BY created_at DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn add_media_item(
        &self,
        user_id: Uuid,
        file_name: &str,
        exercise: Option<Exercise>,
    ) -> PortResult<MediaItem> {
        let record = sqlx::query_as::<_, MediaItemRecord>(
            "INSERT INTO media_items (id, user_id, file_name, exercise) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, file_name, exercise, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(file_name)
        .bind(exercise.map(|e| e.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        record.to_domain()
    }

    async fn list_media_items(&self, user_id: Uuid) -> PortResult<Vec<MediaItem>> {
        let records = sqlx::query_as::<_, MediaItemRecord>(
            "SELECT id, user_id, file_name, exercise, created_at \
             FROM media_items WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_media_item(&self, media_id: Uuid) -> PortResult<MediaItem> {
        let record = sqlx::query_as::<_, MediaItemRecord>(
            "SELECT id, user_id, file_name, exercise, created_at \
             FROM media_items WHERE id = $1",
        )
        .bind(media_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Media item {} not found", media_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        record.to_domain()
    }

    async fn delete_media_item(&self, media_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM media_items WHERE id = $1")
            .bind(media_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Media item {} not found", media_id)));
        }
        Ok(())
    }
}
