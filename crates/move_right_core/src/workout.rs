//! crates/move_right_core/src/workout.rs
//!
//! Rep counting and per-workout scoring. A `WorkoutTracker` consumes one
//! frame of analysis at a time and turns the primary joint angle into a
//! down/up state machine with hysteresis, so jitter around a single
//! threshold cannot double-count a rep.

use crate::domain::{Exercise, FormAssessment, RepDetail};
use crate::pose::JointAngles;

/// Angle thresholds for one exercise's rep state machine.
///
/// A rep starts when the primary angle drops below `down_below` and
/// completes when it rises back above `up_above`.
#[derive(Debug, Clone, Copy)]
struct RepThresholds {
    down_below: f64,
    up_above: f64,
}

impl RepThresholds {
    fn for_exercise(exercise: Exercise) -> Self {
        match exercise {
            // Elbow angle: arms extended ~180, bottom of a pushup well under 95.
            Exercise::Pushup => RepThresholds { down_below: 95.0, up_above: 150.0 },
            // Knee angle: standing ~180, parallel squat under 100.
            Exercise::Squat => RepThresholds { down_below: 100.0, up_above: 160.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepPhase {
    Up,
    Down,
}

/// Tracks one workout over a live capture connection.
#[derive(Debug)]
pub struct WorkoutTracker {
    exercise: Exercise,
    thresholds: RepThresholds,
    phase: RepPhase,
    frames_seen: u64,
    /// Frame verdicts accumulated since the current rep began.
    current_rep_good_frames: u32,
    current_rep_frames: u32,
    completed_reps: Vec<RepDetail>,
}

/// Final numbers for a finished workout, ready to persist.
#[derive(Debug, Clone)]
pub struct WorkoutSummary {
    pub exercise: Exercise,
    pub total_reps: i32,
    pub average_form_score: f64,
    pub rep_details: Vec<RepDetail>,
}

impl WorkoutTracker {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            thresholds: RepThresholds::for_exercise(exercise),
            phase: RepPhase::Up,
            frames_seen: 0,
            current_rep_good_frames: 0,
            current_rep_frames: 0,
            completed_reps: Vec::new(),
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn rep_count(&self) -> u32 {
        self.completed_reps.len() as u32
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Feeds one analyzed frame into the tracker. Returns the rep detail
    /// when this frame completed a rep.
    pub fn observe(
        &mut self,
        angles: &JointAngles,
        assessment: &FormAssessment,
    ) -> Option<RepDetail> {
        self.frames_seen += 1;
        self.current_rep_frames += 1;
        if assessment.is_good_form() {
            self.current_rep_good_frames += 1;
        }

        match self.phase {
            RepPhase::Up if angles.primary < self.thresholds.down_below => {
                self.phase = RepPhase::Down;
                None
            }
            RepPhase::Down if angles.primary > self.thresholds.up_above => {
                self.phase = RepPhase::Up;
                let form_score = if self.current_rep_frames == 0 {
                    0.0
                } else {
                    f64::from(self.current_rep_good_frames) / f64::from(self.current_rep_frames)
                };
                let detail = RepDetail {
                    rep_number: self.rep_count() + 1,
                    form_score,
                };
                self.current_rep_good_frames = 0;
                self.current_rep_frames = 0;
                self.completed_reps.push(detail.clone());
                Some(detail)
            }
            _ => None,
        }
    }

    /// Closes out the workout. Frames in a half-finished rep are dropped;
    /// only completed reps count.
    pub fn finalize(self) -> WorkoutSummary {
        let total_reps = self.completed_reps.len() as i32;
        let average_form_score = if self.completed_reps.is_empty() {
            0.0
        } else {
            self.completed_reps.iter().map(|r| r.form_score).sum::<f64>()
                / self.completed_reps.len() as f64
        };
        WorkoutSummary {
            exercise: self.exercise,
            total_reps,
            average_form_score,
            rep_details: self.completed_reps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormVerdict;

    fn angles(primary: f64) -> JointAngles {
        JointAngles { primary, secondary: 170.0, tertiary: 40.0 }
    }

    fn good() -> FormAssessment {
        FormAssessment { verdict: FormVerdict::Good, confidence: 1.0 }
    }

    fn bad() -> FormAssessment {
        FormAssessment { verdict: FormVerdict::Bad, confidence: -1.0 }
    }

    #[test]
    fn full_descent_and_rise_counts_one_rep() {
        let mut tracker = WorkoutTracker::new(Exercise::Pushup);
        assert!(tracker.observe(&angles(170.0), &good()).is_none());
        assert!(tracker.observe(&angles(80.0), &good()).is_none());
        let rep = tracker.observe(&angles(165.0), &good());
        assert_eq!(rep.unwrap().rep_number, 1);
        assert_eq!(tracker.rep_count(), 1);
    }

    #[test]
    fn jitter_between_thresholds_does_not_count() {
        let mut tracker = WorkoutTracker::new(Exercise::Pushup);
        // Oscillating inside the hysteresis band: never a full rep.
        for primary in [120.0, 140.0, 120.0, 140.0, 120.0] {
            assert!(tracker.observe(&angles(primary), &good()).is_none());
        }
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn partial_descent_is_not_a_rep() {
        let mut tracker = WorkoutTracker::new(Exercise::Squat);
        tracker.observe(&angles(175.0), &good());
        tracker.observe(&angles(120.0), &good()); // above down_below for squats
        tracker.observe(&angles(175.0), &good());
        assert_eq!(tracker.rep_count(), 0);
    }

    #[test]
    fn form_score_is_fraction_of_good_frames() {
        let mut tracker = WorkoutTracker::new(Exercise::Pushup);
        tracker.observe(&angles(170.0), &good());
        tracker.observe(&angles(80.0), &bad());
        tracker.observe(&angles(85.0), &bad());
        let rep = tracker.observe(&angles(165.0), &good()).unwrap();
        assert!((rep.form_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn finalize_averages_rep_scores_and_drops_partial_rep() {
        let mut tracker = WorkoutTracker::new(Exercise::Pushup);
        // Rep 1: all good frames.
        tracker.observe(&angles(170.0), &good());
        tracker.observe(&angles(80.0), &good());
        tracker.observe(&angles(165.0), &good());
        // Rep 2: all bad frames.
        tracker.observe(&angles(80.0), &bad());
        tracker.observe(&angles(165.0), &bad());
        // Half a rep, then the session ends.
        tracker.observe(&angles(80.0), &good());

        let summary = tracker.finalize();
        assert_eq!(summary.total_reps, 2);
        assert!((summary.average_form_score - 0.5).abs() < 1e-9);
        assert_eq!(summary.rep_details.len(), 2);
    }

    #[test]
    fn empty_workout_finalizes_to_zero() {
        let summary = WorkoutTracker::new(Exercise::Squat).finalize();
        assert_eq!(summary.total_reps, 0);
        assert_eq!(summary.average_form_score, 0.0);
    }
}
