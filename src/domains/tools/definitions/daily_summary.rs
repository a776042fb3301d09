//! Daily summary tool definition.
//!
//! Calories against goal, the three macros, exercise totals, water and the
//! day's completion status in one overview.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domains::diary::{Day, DiaryClient, display_date, parse_date};
use crate::domains::tools::common::{DateParams, guarded, ml_to_cups, ml_to_oz, tool_definition};

// ============================================================================
// Tool Definition
// ============================================================================

/// Daily summary tool - one-page overview of a day.
pub struct DailySummaryTool;

impl DailySummaryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_daily_summary";

    /// What the failure message says could not be retrieved.
    pub const SUBJECT: &'static str = "daily summary";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get daily nutrition overview: calories consumed/remaining, macro breakdown, exercise, water, and goals.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = ?params.date))]
    pub async fn execute(params: &DateParams, client: &DiaryClient) -> CallToolResult {
        info!("Daily summary tool called");
        guarded(Self::SUBJECT, async {
            let date = parse_date(params.date.as_deref())?;
            let day = client.fetch_day(date).await?;
            Ok(render(&day))
        })
        .await
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<DiaryClient>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::common::{http_response, parse_http_arguments};

        let params: DateParams = parse_http_arguments(arguments)?;
        Ok(http_response(Self::execute(&params, &client).await))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<DateParams>(Self::NAME, Self::DESCRIPTION)
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(client: Arc<DiaryClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let client = client.clone();
            async move {
                let params: DateParams = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the daily summary report for `day`.
pub fn render(day: &Day) -> String {
    let totals = &day.totals;
    let goals = &day.goals;

    let calories = totals.get_or_zero("calories");
    let calorie_goal = goals.get_or_zero("calories");

    let mut activities = 0;
    let mut minutes = 0.0;
    let mut burned = 0.0;
    for entry in day.exercise_entries() {
        activities += 1;
        burned += entry.nutrition.get_or_zero("calories burned");
        if let Some(m) = entry.nutrition.get("minutes").filter(|m| *m != 0.0) {
            minutes += m;
        }
    }

    let mut out = String::new();
    out.push_str(&format!("# Daily Summary for {}\n", display_date(day.date)));
    out.push('\n');

    out.push_str("## Calories\n");
    out.push_str(&format!("- **Consumed**: {:.0} kcal\n", calories));
    out.push_str(&format!("- **Goal**: {:.0} kcal\n", calorie_goal));
    out.push_str(&format!("- **Remaining**: {:.0} kcal\n", calorie_goal - calories));
    out.push('\n');

    out.push_str("## Macronutrients\n");
    for (key, label) in [
        ("carbohydrates", "Carbohydrates"),
        ("fat", "Fat"),
        ("protein", "Protein"),
    ] {
        out.push_str(&format!(
            "- **{}**: {:.0}g / {:.0}g\n",
            label,
            totals.get_or_zero(key),
            goals.get_or_zero(key)
        ));
    }
    out.push('\n');

    out.push_str("## Exercise\n");
    out.push_str(&format!("- **Activities**: {}\n", activities));
    out.push_str(&format!("- **Duration**: {:.0} minutes\n", minutes));
    out.push_str(&format!("- **Calories Burned**: {:.0} kcal\n", burned));
    out.push('\n');

    out.push_str("## Water Intake\n");
    out.push_str(&format!(
        "- **Amount**: {:.0} oz ({:.1} cups, {:.0} ml)\n",
        ml_to_oz(day.water_ml),
        ml_to_cups(day.water_ml),
        day.water_ml
    ));
    out.push('\n');

    out.push_str("## Status\n");
    out.push_str(&format!(
        "- **Day Complete**: {}\n",
        if day.complete { "Yes" } else { "No" }
    ));
    out.push_str(&format!("- **Meals Logged**: {}\n", day.meals.len()));

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::diary::dates::today;
    use crate::domains::diary::testing::{StubSource, entry, exercise, meal, nutrients, ymd};
    use crate::domains::tools::common::result_text;

    fn sample_day() -> Day {
        let mut day = Day::empty(today());
        day.totals = nutrients(&[
            ("calories", 1800.0),
            ("carbohydrates", 200.0),
            ("fat", 60.0),
            ("protein", 110.0),
        ]);
        day.goals = nutrients(&[
            ("calories", 2000.0),
            ("carbohydrates", 250.0),
            ("fat", 67.0),
            ("protein", 150.0),
        ]);
        day.water_ml = 1500.0;
        day.meals = vec![
            meal("Breakfast", &[("calories", 600.0)], vec![]),
            meal("Lunch", &[("calories", 1200.0)], vec![]),
        ];
        day
    }

    #[tokio::test]
    async fn test_summary_for_today_without_date() {
        let client = StubSource::new().with_day(sample_day()).into_client();
        let result = DailySummaryTool::execute(&DateParams::default(), &client).await;
        let text = result_text(&result);

        assert!(text.contains("Remaining**: 200 kcal"));
        assert!(text.contains("## Water Intake"));
        assert!(text.contains("51 oz (6.3 cups, 1500 ml)"));
        assert!(text.contains("Meals Logged**: 2"));
        assert!(text.contains("- **Activities**: 0"));
        assert!(text.contains("- **Day Complete**: No"));
    }

    #[test]
    fn test_render_macros_and_header() {
        let mut day = sample_day();
        day.date = ymd(2024, 3, 15);
        let text = render(&day);
        assert!(text.starts_with("# Daily Summary for March 15, 2024\n"));
        assert!(text.contains("- **Carbohydrates**: 200g / 250g"));
        assert!(text.contains("- **Protein**: 110g / 150g"));
    }

    #[test]
    fn test_render_exercise_totals() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.exercises = vec![
            exercise(
                "Cardiovascular",
                vec![
                    entry("Running", 30.0, "minutes", &[("minutes", 30.0), ("calories burned", 300.0)]),
                    entry("Walking", 0.0, "minutes", &[("calories burned", 50.0)]),
                ],
            ),
            exercise("Strength Training", vec![entry("Squats", 3.0, "sets", &[("sets", 3.0)])]),
        ];
        day.complete = true;

        let text = render(&day);
        assert!(text.contains("- **Activities**: 3"));
        assert!(text.contains("- **Duration**: 30 minutes"));
        assert!(text.contains("- **Calories Burned**: 350 kcal"));
        assert!(text.contains("- **Day Complete**: Yes"));
    }

    #[test]
    fn test_remaining_may_be_negative() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.totals = nutrients(&[("calories", 2300.0)]);
        day.goals = nutrients(&[("calories", 2000.0)]);
        assert!(render(&day).contains("- **Remaining**: -300 kcal"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_rendered_as_text() {
        let client = StubSource::new().failing_on(ymd(2024, 3, 15)).into_client();
        let result = DailySummaryTool::execute(&DateParams::for_date("2024-03-15"), &client).await;
        assert_eq!(result.is_error, Some(false));
        assert!(result_text(&result).starts_with("Error retrieving daily summary: "));
    }

    #[tokio::test]
    async fn test_bad_date_never_fetches() {
        let stub = Arc::new(StubSource::new());
        let client = DiaryClient::new(stub.clone());
        let result = DailySummaryTool::execute(&DateParams::for_date("03/15/2024"), &client).await;
        assert_eq!(
            result_text(&result),
            "Error retrieving daily summary: Invalid date format: 03/15/2024. Use YYYY-MM-DD"
        );
        assert!(stub.requested().is_empty());
    }
}
