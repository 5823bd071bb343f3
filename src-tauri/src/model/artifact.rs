use std::collections::HashMap;

use serde::Deserialize;

use crate::errors::InferenceError;
use crate::pipeline::features::{FeatureFrame, FeatureValue};

/// Artifact format this build understands. Bumped whenever the document
/// layout changes; the loader refuses anything else.
pub const FORMAT_VERSION: u32 = 1;

/// One regression tree in flat-array form, the way ensemble exporters dump
/// them: node `i` splits `feature[i]` at `threshold[i]` with children
/// `left[i]` / `right[i]`, and `left[i] == -1` marks a leaf predicting
/// `value[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    pub value: Vec<f64>,
}

impl RegressionTree {
    fn node_count(&self) -> usize {
        self.value.len()
    }

    /// Structural soundness: equal array lengths, children strictly after
    /// their parent (so a walk always terminates), split features inside the
    /// schema.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.feature.len() != n
            || self.threshold.len() != n
            || self.left.len() != n
            || self.right.len() != n
        {
            return Err("tree arrays have inconsistent lengths".to_string());
        }

        for i in 0..n {
            if self.left[i] == -1 {
                if self.right[i] != -1 {
                    return Err(format!("node {i} has a left leaf marker but a right child"));
                }
                continue;
            }
            for child in [self.left[i], self.right[i]] {
                if child <= i as i32 || child >= n as i32 {
                    return Err(format!("node {i} has out-of-order child index {child}"));
                }
            }
            let feature = self.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {i} splits on unknown feature index {feature}"));
            }
        }
        Ok(())
    }

    fn predict(&self, features: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.left[node] != -1 {
            node = if features[self.feature[node] as usize] <= self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
        self.value[node]
    }
}

/// The deserialized regression artifact. Read-only after load; the rest of
/// the crate only ever calls [`CalorieModel::predict`].
#[derive(Debug, Clone, Deserialize)]
pub struct CalorieModel {
    pub format_version: u32,
    pub model_type: String,
    pub feature_columns: Vec<String>,
    #[serde(default)]
    pub categorical_levels: HashMap<String, Vec<String>>,
    pub trees: Vec<RegressionTree>,
}

impl CalorieModel {
    /// Reject artifacts whose trees or level tables are internally broken.
    /// Called once by the loader; a failure here is a corrupt artifact.
    pub(crate) fn validate_structure(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("artifact contains no trees".to_string());
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_columns.len())
                .map_err(|reason| format!("tree {index}: {reason}"))?;
        }
        for (column, levels) in &self.categorical_levels {
            if !self.feature_columns.iter().any(|name| name == column) {
                return Err(format!("level table for unknown column \"{column}\""));
            }
            if levels.is_empty() {
                return Err(format!("column \"{column}\" has an empty level table"));
            }
        }
        Ok(())
    }

    /// Encode one frame into the numeric vector the trees walk: categorical
    /// columns become their level index, numeric columns pass through.
    /// Lookup is by column name; a frame missing a column fails here.
    fn encode(&self, frame: &FeatureFrame) -> Result<Vec<f64>, InferenceError> {
        self.feature_columns
            .iter()
            .map(|column| {
                let value = frame
                    .get(column)
                    .ok_or_else(|| InferenceError::MissingColumn(column.clone()))?;

                match (self.categorical_levels.get(column), value) {
                    (Some(levels), FeatureValue::Text(text)) => levels
                        .iter()
                        .position(|level| level == text)
                        .map(|index| index as f64)
                        .ok_or_else(|| InferenceError::UnknownLevel {
                            column: column.clone(),
                            value: text.clone(),
                        }),
                    (None, FeatureValue::Number(number)) => Ok(*number),
                    (Some(_), FeatureValue::Number(_)) => Err(InferenceError::TypeMismatch {
                        column: column.clone(),
                        expected: "categorical",
                    }),
                    (None, FeatureValue::Text(_)) => Err(InferenceError::TypeMismatch {
                        column: column.clone(),
                        expected: "numeric",
                    }),
                }
            })
            .collect()
    }

    /// One forward evaluation: the mean of the per-tree estimates. Synchronous,
    /// deterministic, side-effect-free; no retry on failure.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<f64, InferenceError> {
        let encoded = self.encode(frame)?;
        let total: f64 = self.trees.iter().map(|tree| tree.predict(&encoded)).sum();
        let estimate = total / self.trees.len() as f64;
        if !estimate.is_finite() {
            return Err(InferenceError::NonFinite);
        }
        Ok(estimate)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pipeline::features::{self, assemble};
    use crate::inputs::WorkoutInput;

    fn leaf_tree(value: f64) -> RegressionTree {
        RegressionTree {
            feature: vec![-2],
            threshold: vec![0.0],
            left: vec![-1],
            right: vec![-1],
            value: vec![value],
        }
    }

    /// A minimal artifact over the real schema: one split on Duration plus a
    /// constant tree, so predictions are easy to compute by hand.
    pub(crate) fn tiny_model() -> CalorieModel {
        let split_on_duration = RegressionTree {
            feature: vec![4, -2, -2],
            threshold: vec![30.0, 0.0, 0.0],
            left: vec![1, -1, -1],
            right: vec![2, -1, -1],
            value: vec![0.0, 100.0, 400.0],
        };

        CalorieModel {
            format_version: FORMAT_VERSION,
            model_type: "random_forest_regressor".to_string(),
            feature_columns: features::COLUMNS.iter().map(|c| c.to_string()).collect(),
            categorical_levels: HashMap::from([(
                features::GENDER.to_string(),
                vec!["female".to_string(), "male".to_string()],
            )]),
            trees: vec![split_on_duration, leaf_tree(200.0)],
        }
    }

    #[test]
    fn prediction_is_the_mean_of_tree_estimates() {
        let model = tiny_model();

        let mut input = WorkoutInput::default();
        input.duration = 60.0;
        // Duration 60 falls right of the split: (400 + 200) / 2.
        assert_eq!(model.predict(&assemble(&input)).unwrap(), 300.0);

        input.duration = 20.0;
        assert_eq!(model.predict(&assemble(&input)).unwrap(), 150.0);
    }

    #[test]
    fn missing_body_temp_column_is_an_inference_error() {
        let model = tiny_model();

        let mut frame = assemble(&WorkoutInput::default());
        // Rebuild the frame without Body_Temp.
        let mut partial = crate::pipeline::features::FeatureFrame::new();
        for &column in features::COLUMNS.iter().filter(|c| **c != features::BODY_TEMP) {
            match frame.get(column).unwrap() {
                FeatureValue::Text(text) => partial.push_text(column, text.clone()),
                FeatureValue::Number(number) => partial.push_number(column, *number),
            }
        }
        frame = partial;

        assert_eq!(
            model.predict(&frame).unwrap_err(),
            InferenceError::MissingColumn(features::BODY_TEMP.to_string())
        );
    }

    #[test]
    fn unknown_categorical_level_is_rejected() {
        let model = tiny_model();

        let mut frame = FeatureFrame::new();
        frame.push_text(features::GENDER, "unknown");
        for &column in &features::COLUMNS[1..] {
            frame.push_number(column, 50.0);
        }

        assert!(matches!(
            model.predict(&frame).unwrap_err(),
            InferenceError::UnknownLevel { .. }
        ));
    }

    #[test]
    fn type_confusion_is_rejected() {
        let model = tiny_model();

        let mut frame = FeatureFrame::new();
        frame.push_number(features::GENDER, 1.0);
        for &column in &features::COLUMNS[1..] {
            frame.push_number(column, 50.0);
        }
        assert!(matches!(
            model.predict(&frame).unwrap_err(),
            InferenceError::TypeMismatch {
                expected: "categorical",
                ..
            }
        ));

        let mut frame = FeatureFrame::new();
        frame.push_text(features::GENDER, "male");
        frame.push_text(features::AGE, "25");
        for &column in &features::COLUMNS[2..] {
            frame.push_number(column, 50.0);
        }
        assert!(matches!(
            model.predict(&frame).unwrap_err(),
            InferenceError::TypeMismatch {
                expected: "numeric",
                ..
            }
        ));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let model = tiny_model();
        let mut frame = assemble(&WorkoutInput::default());
        frame.push_number("Elevation", 1200.0);
        assert!(model.predict(&frame).is_ok());
    }

    #[test]
    fn structural_validation_catches_broken_trees() {
        let mut model = tiny_model();
        model.trees[0].left[0] = 0; // child pointing at its own parent
        assert!(model.validate_structure().is_err());

        let mut model = tiny_model();
        model.trees[0].value.pop();
        assert!(model.validate_structure().is_err());

        let mut model = tiny_model();
        model.trees[0].feature[0] = 12; // outside the 7-column schema
        assert!(model.validate_structure().is_err());

        let mut model = tiny_model();
        model.trees.clear();
        assert!(model.validate_structure().is_err());
    }

    #[test]
    fn non_finite_estimates_are_reported_not_returned() {
        let mut model = tiny_model();
        model.trees = vec![
            RegressionTree {
                feature: vec![-2],
                threshold: vec![0.0],
                left: vec![-1],
                right: vec![-1],
                value: vec![f64::NAN],
            },
        ];
        assert_eq!(
            model.predict(&assemble(&WorkoutInput::default())).unwrap_err(),
            InferenceError::NonFinite
        );
    }
}
