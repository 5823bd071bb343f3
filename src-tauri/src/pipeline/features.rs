use serde::Serialize;

use crate::inputs::WorkoutInput;

/// Column names the regressor was fitted against. Casing and order are part
/// of the artifact contract; `model::loader` refuses artifacts that disagree,
/// so a mismatch is caught at startup instead of mid-inference.
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const HEIGHT: &str = "Height";
pub const WEIGHT: &str = "Weight";
pub const DURATION: &str = "Duration";
pub const HEART_RATE: &str = "Heart_Rate";
pub const BODY_TEMP: &str = "Body_Temp";

pub const COLUMNS: [&str; 7] = [GENDER, AGE, HEIGHT, WEIGHT, DURATION, HEART_RATE, BODY_TEMP];

/// A single cell of a feature frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Text(String),
    Number(f64),
}

/// One single-row feature record: ordered (column, value) pairs. The model
/// looks cells up by column name, never by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFrame {
    cells: Vec<(String, FeatureValue)>,
}

impl FeatureFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, column: &str, value: impl Into<String>) {
        self.cells
            .push((column.to_string(), FeatureValue::Text(value.into())));
    }

    pub fn push_number(&mut self, column: &str, value: f64) {
        self.cells
            .push((column.to_string(), FeatureValue::Number(value)));
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Build the seven-column frame the model expects from a validated input.
/// Gender enters in its lowercase feature form; everything else is numeric.
pub fn assemble(input: &WorkoutInput) -> FeatureFrame {
    let mut frame = FeatureFrame::new();
    frame.push_text(GENDER, input.gender.as_feature_level());
    frame.push_number(AGE, f64::from(input.age));
    frame.push_number(HEIGHT, input.height);
    frame.push_number(WEIGHT, input.weight);
    frame.push_number(DURATION, input.duration);
    frame.push_number(HEART_RATE, input.heart_rate);
    frame.push_number(BODY_TEMP, input.body_temp);
    frame
}
