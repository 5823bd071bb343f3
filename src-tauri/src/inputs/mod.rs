use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection of a submitted value. The widget layer clamps; the pipeline
/// never does. Anything outside its declared domain fails the request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("gender must be \"male\" or \"female\", got \"{0}\"")]
    UnknownGender(String),
}

/// The categorical input exactly as the trained model saw it: two levels,
/// always lowercase on the wire and in feature frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Lowercase feature form. Normalization is idempotent: the output of
    /// this function parses back to the same variant.
    pub fn as_feature_level(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Case-insensitive on purpose, but membership is validated: an
        // unknown string is an error, not a silent mis-prediction.
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(InputError::UnknownGender(s.to_string())),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = InputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.as_feature_level().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_feature_level())
    }
}

/// One row of the input contract: domain, default, and the labels the form
/// renders. Served to the webview so widgets clamp against the same table
/// the pipeline validates against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLimit {
    pub field: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

pub const AGE: FieldLimit = FieldLimit {
    field: "age",
    label: "Age",
    unit: "years",
    min: 10.0,
    max: 100.0,
    default: 25.0,
    step: 1.0,
};

pub const HEIGHT: FieldLimit = FieldLimit {
    field: "height",
    label: "Height",
    unit: "cm",
    min: 100.0,
    max: 250.0,
    default: 170.0,
    step: 1.0,
};

pub const WEIGHT: FieldLimit = FieldLimit {
    field: "weight",
    label: "Weight",
    unit: "kg",
    min: 30.0,
    max: 200.0,
    default: 70.0,
    step: 1.0,
};

pub const DURATION: FieldLimit = FieldLimit {
    field: "duration",
    label: "Workout Duration",
    unit: "minutes",
    min: 1.0,
    max: 300.0,
    default: 60.0,
    step: 1.0,
};

pub const HEART_RATE: FieldLimit = FieldLimit {
    field: "heartRate",
    label: "Average Heart Rate",
    unit: "bpm",
    min: 60.0,
    max: 200.0,
    default: 120.0,
    step: 1.0,
};

pub const BODY_TEMP: FieldLimit = FieldLimit {
    field: "bodyTemp",
    label: "Body Temperature",
    unit: "°C",
    min: 35.0,
    max: 42.0,
    default: 37.0,
    step: 0.1,
};

pub const FIELD_LIMITS: [FieldLimit; 6] = [AGE, HEIGHT, WEIGHT, DURATION, HEART_RATE, BODY_TEMP];

/// One complete prediction request as the form submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInput {
    pub gender: Gender,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub duration: f64,
    pub heart_rate: f64,
    pub body_temp: f64,
}

impl Default for WorkoutInput {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: AGE.default as u32,
            height: HEIGHT.default,
            weight: WEIGHT.default,
            duration: DURATION.default,
            heart_rate: HEART_RATE.default,
            body_temp: BODY_TEMP.default,
        }
    }
}

impl WorkoutInput {
    /// Check every numeric field against its declared domain. Values are
    /// rejected, never adjusted; clamping is the widget layer's job.
    pub fn validate(&self) -> Result<(), InputError> {
        check(&AGE, f64::from(self.age))?;
        check(&HEIGHT, self.height)?;
        check(&WEIGHT, self.weight)?;
        check(&DURATION, self.duration)?;
        check(&HEART_RATE, self.heart_rate)?;
        check(&BODY_TEMP, self.body_temp)?;
        Ok(())
    }
}

fn check(limit: &FieldLimit, value: f64) -> Result<(), InputError> {
    if !value.is_finite() || value < limit.min || value > limit.max {
        return Err(InputError::OutOfRange {
            field: limit.field,
            min: limit.min,
            max: limit.max,
            value,
        });
    }
    Ok(())
}

/// Everything the form needs to build its widgets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSchema {
    pub genders: Vec<&'static str>,
    pub fields: Vec<FieldLimit>,
    pub defaults: WorkoutInput,
}

impl InputSchema {
    pub fn current() -> Self {
        Self {
            genders: vec![
                Gender::Male.as_feature_level(),
                Gender::Female.as_feature_level(),
            ],
            fields: FIELD_LIMITS.to_vec(),
            defaults: WorkoutInput::default(),
        }
    }
}
