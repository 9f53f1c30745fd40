//! services/api/src/adapters/classifier.rs
//!
//! This module contains the adapter for the exercise form classifier.
//! It implements the `FormClassifierService` port from the `core` crate with
//! a linear SVM whose per-exercise parameters (standard-scaler statistics,
//! weights, bias) are trained offline and shipped as a JSON model file.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use move_right_core::domain::{Exercise, FormAssessment, FormVerdict};
use move_right_core::ports::{FormClassifierService, PortError, PortResult};
use move_right_core::pose::JointAngles;
use serde::Deserialize;

//=========================================================================================
// Model File Format
//=========================================================================================

/// The trained parameters for one exercise: a standard scaler followed by
/// a linear decision function over the three joint angles.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseModel {
    pub scaler_mean: [f64; 3],
    pub scaler_scale: [f64; 3],
    pub weights: [f64; 3],
    pub bias: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ModelFile {
    #[serde(flatten)]
    exercises: HashMap<String, ExerciseModel>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that classifies exercise form with a linear SVM loaded from disk.
pub struct LinearFormClassifier {
    models: HashMap<Exercise, ExerciseModel>,
}

impl LinearFormClassifier {
    /// Loads the model file and validates that every entry names a known exercise.
    pub fn from_file(path: &Path) -> Result<Self, PortError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PortError::Unexpected(format!("Failed to read model file {}: {}", path.display(), e))
        })?;
        let file: ModelFile = serde_json::from_str(&raw).map_err(|e| {
            PortError::Unexpected(format!("Failed to parse model file {}: {}", path.display(), e))
        })?;

        let mut models = HashMap::new();
        for (name, model) in file.exercises {
            let exercise = name
                .parse::<Exercise>()
                .map_err(|e| PortError::Unexpected(format!("Model file: {}", e)))?;
            for scale in model.scaler_scale {
                if scale == 0.0 {
                    return Err(PortError::Unexpected(format!(
                        "Model for {} has a zero scaler component",
                        exercise
                    )));
                }
            }
            models.insert(exercise, model);
        }

        if models.is_empty() {
            return Err(PortError::Unexpected(format!(
                "Model file {} contains no exercises",
                path.display()
            )));
        }

        Ok(Self { models })
    }

    fn decision_value(model: &ExerciseModel, angles: &JointAngles) -> f64 {
        let x = angles.as_array();
        let mut decision = model.bias;
        for i in 0..3 {
            let scaled = (x[i] - model.scaler_mean[i]) / model.scaler_scale[i];
            decision += model.weights[i] * scaled;
        }
        decision
    }
}

//=========================================================================================
// `FormClassifierService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FormClassifierService for LinearFormClassifier {
    async fn classify(
        &self,
        exercise: Exercise,
        angles: &JointAngles,
    ) -> PortResult<FormAssessment> {
        let model = self
            .models
            .get(&exercise)
            .ok_or_else(|| PortError::NotFound(format!("No model for {}", exercise)))?;

        let confidence = Self::decision_value(model, angles);
        let verdict = if confidence >= 0.0 { FormVerdict::Good } else { FormVerdict::Bad };
        Ok(FormAssessment { verdict, confidence })
    }

    fn supported_exercises(&self) -> Vec<Exercise> {
        self.models.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_model(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp model file");
        file.write_all(json.as_bytes()).expect("write model json");
        file
    }

    const PUSHUP_ONLY: &str = r#"{
        "pushup": {
            "scaler_mean": [120.0, 160.0, 45.0],
            "scaler_scale": [30.0, 15.0, 20.0],
            "weights": [1.0, 0.5, -0.25],
            "bias": 0.1
        }
    }"#;

    #[test]
    fn loads_a_valid_model_file() {
        let file = write_model(PUSHUP_ONLY);
        let classifier = LinearFormClassifier::from_file(file.path()).unwrap();
        assert_eq!(classifier.supported_exercises(), vec![Exercise::Pushup]);
    }

    #[test]
    fn rejects_unknown_exercise_names() {
        let file = write_model(r#"{"deadlift": {"scaler_mean": [0,0,0], "scaler_scale": [1,1,1], "weights": [0,0,0], "bias": 0}}"#);
        assert!(LinearFormClassifier::from_file(file.path()).is_err());
    }

    #[test]
    fn rejects_zero_scaler_components() {
        let file = write_model(r#"{"squat": {"scaler_mean": [0,0,0], "scaler_scale": [1,0,1], "weights": [0,0,0], "bias": 0}}"#);
        assert!(LinearFormClassifier::from_file(file.path()).is_err());
    }

    #[test]
    fn classifies_against_the_decision_boundary() {
        let file = write_model(PUSHUP_ONLY);
        let classifier = LinearFormClassifier::from_file(file.path()).unwrap();

        // At the scaler means the decision value is exactly the bias (0.1): good.
        let at_mean = JointAngles { primary: 120.0, secondary: 160.0, tertiary: 45.0 };
        let assessment = tokio_test::block_on(classifier.classify(Exercise::Pushup, &at_mean)).unwrap();
        assert_eq!(assessment.verdict, FormVerdict::Good);
        assert!((assessment.confidence - 0.1).abs() < 1e-9);

        // Dropping the primary angle two scaler units pushes the decision negative.
        let collapsed = JointAngles { primary: 60.0, secondary: 160.0, tertiary: 45.0 };
        let assessment =
            tokio_test::block_on(classifier.classify(Exercise::Pushup, &collapsed)).unwrap();
        assert_eq!(assessment.verdict, FormVerdict::Bad);
    }

    #[test]
    fn missing_exercise_is_not_found() {
        let file = write_model(PUSHUP_ONLY);
        let classifier = LinearFormClassifier::from_file(file.path()).unwrap();
        let angles = JointAngles { primary: 90.0, secondary: 90.0, tertiary: 90.0 };
        let result = tokio_test::block_on(classifier.classify(Exercise::Squat, &angles));
        assert!(matches!(result, Err(PortError::NotFound(_))));
    }
}
