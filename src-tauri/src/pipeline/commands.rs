use log::{info, warn};
use tauri::State;

use crate::inputs::{InputSchema, WorkoutInput};
use crate::pipeline::{self, PredictionOutcome};
use crate::AppState;

/// Field limits and defaults, served so the form clamps its widgets against
/// the same table the pipeline validates against.
#[tauri::command]
pub fn input_schema() -> Result<InputSchema, String> {
    Ok(InputSchema::current())
}

/// The one user trigger: a complete input in, a prediction outcome out.
/// Failures are per-request; the app stays usable afterwards.
#[tauri::command]
pub fn predict_calories(
    input: WorkoutInput,
    state: State<'_, AppState>,
) -> Result<PredictionOutcome, String> {
    match pipeline::run_prediction(&input, &state.model) {
        Ok(outcome) => {
            info!("predicted {} for {} workout", outcome.display, input.gender);
            Ok(outcome)
        }
        Err(err) => {
            warn!("prediction failed: {err}");
            Err(err.to_string())
        }
    }
}
