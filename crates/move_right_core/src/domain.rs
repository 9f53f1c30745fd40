//! crates/move_right_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format,
//! except for the handful of types that travel over the wire or live in
//! JSON columns (Exercise, RepDetail, FormAssessment).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The exercises the app knows how to track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Pushup,
    Squat,
}

impl Exercise {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::Pushup => "pushup",
            Exercise::Squat => "squat",
        }
    }
}

impl std::str::FromStr for Exercise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pushup" => Ok(Exercise::Pushup),
            "squat" => Ok(Exercise::Squat),
            other => Err(format!("Unknown exercise type: '{}'", other)),
        }
    }
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    /// Height, feet component (3-7).
    pub height_feet: i32,
    /// Height, inches component (0-11).
    pub height_inches: i32,
    /// Weight in lbs.
    pub weight_lbs: f64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Height formatted the way the profile page shows it, e.g. `5'11"`.
    pub fn formatted_height(&self) -> String {
        format!("{}'{}\"", self.height_feet, self.height_inches)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A user's review of the app. At most one per account.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub comment: String,
    /// Rating between 0 and 5.
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary data for a single completed rep, stored as part of the
/// workout's rep-by-rep detail column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepDetail {
    pub rep_number: u32,
    /// Fraction of analyzed frames during the rep that classified as good form.
    pub form_score: f64,
}

/// A completed workout session.
#[derive(Debug, Clone)]
pub struct WorkoutResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise: Exercise,
    pub total_reps: i32,
    pub average_form_score: f64,
    pub session_duration_secs: i32,
    pub rep_details: Vec<RepDetail>,
    pub created_at: DateTime<Utc>,
}

/// An entry in a user's media library, referencing a stored snapshot file.
#[derive(Debug, Clone)]
pub struct MediaItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub exercise: Option<Exercise>,
    pub created_at: DateTime<Utc>,
}

/// The classifier's verdict on a single frame of exercise form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormVerdict {
    Good,
    Bad,
}

/// One frame's form classification: verdict plus the signed distance from
/// the decision boundary (positive means good form).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormAssessment {
    pub verdict: FormVerdict,
    pub confidence: f64,
}

impl FormAssessment {
    pub fn is_good_form(&self) -> bool {
        self.verdict == FormVerdict::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn exercise_round_trips_through_strings() {
        assert_eq!("pushup".parse::<Exercise>().unwrap(), Exercise::Pushup);
        assert_eq!("Squat".parse::<Exercise>().unwrap(), Exercise::Squat);
        assert_eq!(Exercise::Pushup.as_str(), "pushup");
        assert!("deadlift".parse::<Exercise>().is_err());
    }

    #[test]
    fn sessions_expire_at_their_deadline() {
        let now = Utc::now();
        let session = AuthSession {
            id: "token".to_string(),
            user_id: Uuid::new_v4(),
            expires_at: now + Duration::hours(1),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(1)));
        assert!(session.is_expired(now + Duration::hours(2)));
    }

    #[test]
    fn height_formats_like_the_profile_page() {
        let user = User {
            user_id: Uuid::new_v4(),
            first_name: "Dana".to_string(),
            last_name: "Cruz".to_string(),
            email: "dana@yahoo.com".to_string(),
            age: 31,
            height_feet: 5,
            height_inches: 11,
            weight_lbs: 150.0,
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(user.formatted_height(), "5'11\"");
        assert_eq!(user.full_name(), "Dana Cruz");
    }
}
