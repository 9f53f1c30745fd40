//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for the live exercise-capture channel.

use move_right_core::domain::{Exercise, FormVerdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use move_right_core::pose::{JointAngles, Landmark};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================
// NOTE: Snapshot images are sent as raw Binary frames (JPEG bytes), not as
// part of this enum. The client runs pose detection locally and streams the
// resulting landmark frames up as `frame` messages.
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts a workout. This must be the first message sent on the connection.
    Init { exercise: Exercise },

    /// One frame of pose landmarks from the client-side detector.
    Frame { landmarks: Vec<Landmark> },

    /// Ends the workout: the server persists the result and resets the tracker.
    EndWorkout,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms successful workout initialization.
    SessionInitialized { exercise: Exercise },

    /// Per-frame analysis: named joint angles, the form verdict, and the
    /// running rep count.
    FrameAnalysis {
        angles: BTreeMap<&'static str, f64>,
        verdict: FormVerdict,
        confidence: f64,
        rep_count: u32,
    },

    /// Signals that the last frame completed a rep.
    RepCompleted { rep_number: u32, form_score: f64 },

    /// Confirms a binary snapshot was stored in the user's media library.
    SnapshotSaved { media_id: Uuid, file_name: String },

    /// Confirms the finished workout was persisted.
    WorkoutSaved {
        result_id: Uuid,
        total_reps: i32,
        average_form_score: f64,
    },

    /// Reports an error to the client. The connection stays open unless the
    /// client closes it.
    Error { message: String },
}

impl ServerMessage {
    /// Builds the labeled angle map for a `FrameAnalysis` message, pairing
    /// each angle with its exercise-specific name (e.g. `elbow` / `knee`).
    pub fn labeled_angles(exercise: Exercise, angles: &JointAngles) -> BTreeMap<&'static str, f64> {
        JointAngles::labels(exercise)
            .into_iter()
            .zip(angles.as_array())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_deserialize_from_tagged_json() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "init", "exercise": "pushup"}"#)
            .expect("valid init message");
        assert!(matches!(msg, ClientMessage::Init { exercise: Exercise::Pushup }));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type": "frame", "landmarks": [{"x": 0.1, "y": 0.2}, {"x": 0.3, "y": 0.4, "z": 0.5}]}"#,
        )
        .expect("valid frame message");
        match msg {
            ClientMessage::Frame { landmarks } => {
                assert_eq!(landmarks.len(), 2);
                assert_eq!(landmarks[0].z, 0.0);
            }
            other => panic!("unexpected message: {:?}", other),
        }

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "end_workout"}"#).expect("valid end message");
        assert!(matches!(msg, ClientMessage::EndWorkout));
    }

    #[test]
    fn frame_analysis_serializes_named_angles() {
        let angles = JointAngles { primary: 90.0, secondary: 170.0, tertiary: 45.0 };
        let msg = ServerMessage::FrameAnalysis {
            angles: ServerMessage::labeled_angles(Exercise::Pushup, &angles),
            verdict: FormVerdict::Good,
            confidence: 0.8,
            rep_count: 3,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"frame_analysis""#));
        assert!(json.contains(r#""elbow":90.0"#));
        assert!(json.contains(r#""verdict":"good""#));
    }
}
