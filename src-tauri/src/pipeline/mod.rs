pub mod chart;
pub mod commands;
pub mod comparison;
pub mod features;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::InferenceError;
use crate::inputs::WorkoutInput;
use crate::model::CalorieModel;

use self::chart::ChartSpec;
use self::comparison::ComparisonRow;

/// Everything one trigger produces. Ephemeral: the frontend renders it and
/// the next prediction replaces it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    pub calories: f64,
    pub display: String,
    pub generated_at: DateTime<Utc>,
    pub comparison: Vec<ComparisonRow>,
    pub chart: ChartSpec,
}

/// Run one prediction: validate the input, assemble the feature frame,
/// invoke the model, derive the comparison table and chart spec. Pure and
/// synchronous; a failure here is per-request and leaves no trace.
pub fn run_prediction(
    input: &WorkoutInput,
    model: &CalorieModel,
) -> Result<PredictionOutcome, InferenceError> {
    input.validate()?;

    let frame = features::assemble(input);
    let estimate = model.predict(&frame)?;
    if estimate < 0.0 {
        return Err(InferenceError::ImplausibleEstimate(estimate));
    }

    let comparison = comparison::comparison_table(estimate);
    let chart = chart::chart_spec(&comparison);

    Ok(PredictionOutcome {
        calories: estimate,
        display: format!("{estimate:.2} kcal"),
        generated_at: Utc::now(),
        comparison,
        chart,
    })
}
