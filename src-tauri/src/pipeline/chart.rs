use serde::Serialize;

use crate::pipeline::comparison::ComparisonRow;

/// One rendered bar: label, raw value, and the preformatted text the
/// renderer places above the bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
    pub text: String,
}

/// Declarative bar-chart description handed to the webview. The backend's
/// responsibility ends here; drawing pixels is the renderer's problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_legend: bool,
    pub bars: Vec<ChartBar>,
}

/// Value labels are whole kilocalories, rounded to nearest.
pub fn format_kcal(value: f64) -> String {
    format!("{value:.0} kcal")
}

/// Emit the spec for a comparison table, one bar per row in table order.
pub fn chart_spec(rows: &[ComparisonRow]) -> ChartSpec {
    ChartSpec {
        title: "Calories Burned Comparison Chart".to_string(),
        x_label: "Activity".to_string(),
        y_label: "Calories Burned (kcal)".to_string(),
        show_legend: false,
        bars: rows
            .iter()
            .map(|row| ChartBar {
                label: row.activity.clone(),
                value: row.calories,
                text: format_kcal(row.calories),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::comparison::comparison_table;

    #[test]
    fn value_labels_round_to_whole_kilocalories() {
        assert_eq!(format_kcal(245.67), "246 kcal");
        assert_eq!(format_kcal(245.2), "245 kcal");
        assert_eq!(format_kcal(120.0), "120 kcal");
        assert_eq!(format_kcal(0.0), "0 kcal");
    }

    #[test]
    fn spec_mirrors_the_table_in_order_with_no_legend() {
        let rows = comparison_table(245.67);
        let spec = chart_spec(&rows);

        assert!(!spec.show_legend);
        assert_eq!(spec.bars.len(), 4);
        assert_eq!(spec.x_label, "Activity");
        assert_eq!(spec.y_label, "Calories Burned (kcal)");

        let labels: Vec<&str> = spec.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Walking (30 min)",
                "Jogging (30 min)",
                "Cycling (30 min)",
                "Your Workout"
            ]
        );
        assert_eq!(spec.bars[3].text, "246 kcal");
        assert_eq!(spec.bars[3].value, 245.67);
    }

    #[test]
    fn spec_serializes_camel_case_for_the_webview() {
        let spec = chart_spec(&comparison_table(100.0));
        let value = serde_json::to_value(&spec).unwrap();

        assert!(value.get("xLabel").is_some());
        assert!(value.get("yLabel").is_some());
        assert_eq!(value["showLegend"], serde_json::json!(false));
        assert_eq!(value["bars"][0]["text"], serde_json::json!("120 kcal"));
    }
}
