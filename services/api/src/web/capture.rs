//! services/api/src/web/capture.rs
//!
//! This module contains the "worker" functions behind the live-capture
//! WebSocket: per-frame analysis and end-of-workout persistence. The
//! connection handler stays a thin message loop.

use move_right_core::domain::RepDetail;
use move_right_core::pose::{self, Landmark};
use move_right_core::ports::{PortError, PortResult};
use move_right_core::workout::WorkoutTracker;
use std::sync::Arc;
use tracing::info;

use crate::web::{
    protocol::ServerMessage,
    state::{AppState, CaptureState},
};

/// The outcome of analyzing one landmark frame.
#[derive(Debug)]
pub struct FrameOutcome {
    /// The analysis to stream back for this frame.
    pub analysis: ServerMessage,
    /// Set when this frame completed a rep.
    pub completed_rep: Option<RepDetail>,
}

/// Analyzes one frame: joint angles, form classification, rep tracking.
pub async fn analyze_frame(
    app_state: &Arc<AppState>,
    capture: &mut CaptureState,
    landmarks: &[Landmark],
) -> PortResult<FrameOutcome> {
    let exercise = capture.exercise;
    let angles = pose::extract_angles(exercise, landmarks).ok_or_else(|| {
        PortError::Unexpected("Frame does not contain a full landmark set".to_string())
    })?;

    let assessment = app_state.classifier.classify(exercise, &angles).await?;
    let completed_rep = capture.tracker.observe(&angles, &assessment);

    let analysis = ServerMessage::FrameAnalysis {
        angles: ServerMessage::labeled_angles(exercise, &angles),
        verdict: assessment.verdict,
        confidence: assessment.confidence,
        rep_count: capture.tracker.rep_count(),
    };

    Ok(FrameOutcome { analysis, completed_rep })
}

/// Persists the finished workout and resets the capture state for the next one.
///
/// Returns `None` when no frames were observed; an empty workout is not
/// worth a database row.
pub async fn finalize_workout(
    app_state: &Arc<AppState>,
    capture: &mut CaptureState,
) -> PortResult<Option<ServerMessage>> {
    if capture.tracker.frames_seen() == 0 {
        return Ok(None);
    }

    let duration_secs = capture.started_at.elapsed().as_secs() as i32;
    let tracker = std::mem::replace(&mut capture.tracker, WorkoutTracker::new(capture.exercise));
    let summary = tracker.finalize();

    let result = app_state
        .db
        .save_workout_result(
            capture.user_id,
            summary.exercise,
            summary.total_reps,
            summary.average_form_score,
            duration_secs,
            &summary.rep_details,
        )
        .await?;

    info!(
        "Saved workout {} for user {}: {} reps of {}",
        result.id, capture.user_id, result.total_reps, result.exercise
    );

    capture.reset();

    Ok(Some(ServerMessage::WorkoutSaved {
        result_id: result.id,
        total_reps: result.total_reps,
        average_form_score: result.average_form_score,
    }))
}
