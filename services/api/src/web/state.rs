//! services/api/src/web/state.rs
//!
//! Defines the application's shared and per-connection states.

use crate::config::Config;
use move_right_core::domain::Exercise;
use move_right_core::ports::{DatabaseService, FormClassifierService};
use move_right_core::workout::WorkoutTracker;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub classifier: Arc<dyn FormClassifierService>,
}

//=========================================================================================
// CaptureState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active live-capture connection.
pub struct CaptureState {
    pub user_id: Uuid,
    pub exercise: Exercise,
    pub tracker: WorkoutTracker,
    /// When the workout started, for the persisted session duration.
    pub started_at: Instant,
}

impl CaptureState {
    /// Creates the state for a freshly initialized capture session.
    pub fn new(user_id: Uuid, exercise: Exercise) -> Self {
        Self {
            user_id,
            exercise,
            tracker: WorkoutTracker::new(exercise),
            started_at: Instant::now(),
        }
    }

    /// Swaps in a fresh tracker so the connection can run another workout
    /// after the previous one was saved.
    pub fn reset(&mut self) {
        self.tracker = WorkoutTracker::new(self.exercise);
        self.started_at = Instant::now();
    }
}
