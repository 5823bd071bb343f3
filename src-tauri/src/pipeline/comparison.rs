use serde::Serialize;

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub activity: String,
    pub calories: f64,
}

/// Fixed reference burns shown next to every prediction (30-minute efforts).
pub const REFERENCE_ACTIVITIES: [(&str, f64); 3] = [
    ("Walking (30 min)", 120.0),
    ("Jogging (30 min)", 240.0),
    ("Cycling (30 min)", 180.0),
];

/// Label for the row carrying the current estimate.
pub const YOUR_WORKOUT_LABEL: &str = "Your Workout";

/// Build the 4-row table: references first, the fresh estimate last. The
/// table is rebuilt from scratch on every trigger; nothing accumulates
/// across requests.
pub fn comparison_table(estimate: f64) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = REFERENCE_ACTIVITIES
        .iter()
        .map(|&(activity, calories)| ComparisonRow {
            activity: activity.to_string(),
            calories,
        })
        .collect();

    rows.push(ComparisonRow {
        activity: YOUR_WORKOUT_LABEL.to_string(),
        calories: estimate,
    });

    rows
}
