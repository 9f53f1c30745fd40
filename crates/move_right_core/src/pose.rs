//! crates/move_right_core/src/pose.rs
//!
//! Pose geometry: landmark frames as produced by a client-side pose
//! detector, and the joint-angle math used to judge exercise form.
//!
//! Landmark indices follow the 33-point full-body convention
//! (7 = left ear, 11 = left shoulder, 13 = left elbow, ...), so a browser
//! running a standard pose model can stream its output up unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::Exercise;

/// Number of landmarks in a full-body pose frame.
pub const LANDMARK_COUNT: usize = 33;

pub const LEFT_EAR: usize = 7;
pub const LEFT_SHOULDER: usize = 11;
pub const LEFT_ELBOW: usize = 13;
pub const LEFT_WRIST: usize = 15;
pub const LEFT_HIP: usize = 23;
pub const LEFT_KNEE: usize = 25;
pub const LEFT_ANKLE: usize = 27;

/// A single pose landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// The three joint angles that characterize one frame of an exercise.
///
/// The primary angle drives rep counting (elbow for pushups, knee for
/// squats); all three feed the form classifier in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
}

impl JointAngles {
    pub fn as_array(&self) -> [f64; 3] {
        [self.primary, self.secondary, self.tertiary]
    }

    /// The names of the three angles for the given exercise, in the same
    /// order `as_array` returns them. Used to label streaming analysis.
    pub fn labels(exercise: Exercise) -> [&'static str; 3] {
        match exercise {
            Exercise::Pushup => ["elbow", "body", "shoulder"],
            Exercise::Squat => ["knee", "hip", "back"],
        }
    }
}

/// Interior angle at `b` formed by the segments `b->a` and `b->c`, in
/// degrees, folded into [0, 180].
pub fn joint_angle(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    let radians = (c[1] - b[1]).atan2(c[0] - b[0]) - (a[1] - b[1]).atan2(a[0] - b[0]);
    let mut angle = (radians.to_degrees()).abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

/// Extracts the exercise's joint angles from a landmark frame.
///
/// Returns `None` when the frame does not carry the full landmark set, so
/// callers can skip frames where the client lost tracking.
pub fn extract_angles(exercise: Exercise, landmarks: &[Landmark]) -> Option<JointAngles> {
    if landmarks.len() < LANDMARK_COUNT {
        return None;
    }

    let angles = match exercise {
        Exercise::Pushup => {
            let shoulder = landmarks[LEFT_SHOULDER].xy();
            let elbow = landmarks[LEFT_ELBOW].xy();
            let wrist = landmarks[LEFT_WRIST].xy();
            let hip = landmarks[LEFT_HIP].xy();
            let ankle = landmarks[LEFT_ANKLE].xy();
            let ear = landmarks[LEFT_EAR].xy();

            JointAngles {
                primary: joint_angle(shoulder, elbow, wrist),
                secondary: joint_angle(shoulder, hip, ankle),
                tertiary: joint_angle(ear, shoulder, elbow),
            }
        }
        Exercise::Squat => {
            let hip = landmarks[LEFT_HIP].xy();
            let knee = landmarks[LEFT_KNEE].xy();
            let ankle = landmarks[LEFT_ANKLE].xy();
            let shoulder = landmarks[LEFT_SHOULDER].xy();

            JointAngles {
                primary: joint_angle(hip, knee, ankle),
                secondary: joint_angle(shoulder, hip, knee),
                tertiary: joint_angle(shoulder, hip, ankle),
            }
        }
    };

    Some(angles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeroed_frame() -> Vec<Landmark> {
        vec![Landmark { x: 0.0, y: 0.0, z: 0.0 }; LANDMARK_COUNT]
    }

    #[test]
    fn right_angle_is_ninety_degrees() {
        let angle = joint_angle([1.0, 0.0], [0.0, 0.0], [0.0, 1.0]);
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn straight_line_is_one_eighty() {
        let angle = joint_angle([-1.0, 0.0], [0.0, 0.0], [1.0, 0.0]);
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn reflex_angles_fold_back_under_one_eighty() {
        // Raw sweep from 90 to -135 degrees is 225; the interior angle is 135.
        let angle = joint_angle([0.0, 1.0], [0.0, 0.0], [-1.0, -1.0]);
        assert!((angle - 135.0).abs() < 1e-9);
    }

    #[test]
    fn short_frame_yields_no_angles() {
        let landmarks = vec![Landmark { x: 0.5, y: 0.5, z: 0.0 }; 10];
        assert!(extract_angles(Exercise::Pushup, &landmarks).is_none());
    }

    #[test]
    fn pushup_angles_use_elbow_as_primary() {
        let mut frame = zeroed_frame();
        // Arm bent at a right angle: shoulder above elbow, wrist out to the side.
        frame[LEFT_SHOULDER] = Landmark { x: 0.0, y: 0.0, z: 0.0 };
        frame[LEFT_ELBOW] = Landmark { x: 0.0, y: 1.0, z: 0.0 };
        frame[LEFT_WRIST] = Landmark { x: 1.0, y: 1.0, z: 0.0 };
        // Body roughly straight for the secondary angle.
        frame[LEFT_HIP] = Landmark { x: 2.0, y: 0.0, z: 0.0 };
        frame[LEFT_ANKLE] = Landmark { x: 4.0, y: 0.0, z: 0.0 };
        frame[LEFT_EAR] = Landmark { x: -0.5, y: -0.5, z: 0.0 };

        let angles = extract_angles(Exercise::Pushup, &frame).unwrap();
        assert!((angles.primary - 90.0).abs() < 1e-9);
        assert!((angles.secondary - 180.0).abs() < 1e-9);
    }

    #[test]
    fn angle_labels_match_exercise() {
        assert_eq!(JointAngles::labels(Exercise::Pushup), ["elbow", "body", "shoulder"]);
        assert_eq!(JointAngles::labels(Exercise::Squat), ["knee", "hip", "back"]);
    }
}
