//! Daily macros tool definition.
//!
//! Macronutrients against their goals followed by whatever fat breakdown and
//! micronutrients the day actually recorded.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domains::diary::{Day, DiaryClient, Nutrients, display_date, parse_date};
use crate::domains::tools::common::{DateParams, guarded, tool_definition};

// ============================================================================
// Tool Definition
// ============================================================================

/// Daily macros tool - full nutrient breakdown.
pub struct DailyMacrosTool;

impl DailyMacrosTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_daily_macros";

    /// What the failure message says could not be retrieved.
    pub const SUBJECT: &'static str = "macros";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get comprehensive macro and micronutrient breakdown with all tracked nutrients.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = ?params.date))]
    pub async fn execute(params: &DateParams, client: &DiaryClient) -> CallToolResult {
        info!("Daily macros tool called");
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

/// Fat breakdown lines, shown only for keys the day recorded.
const FAT_BREAKDOWN: [(&str, &str); 4] = [
    ("saturated fat", "Saturated"),
    ("polyunsaturated fat", "Polyunsaturated"),
    ("monounsaturated fat", "Monounsaturated"),
    ("trans fat", "Trans"),
];

const MICRONUTRIENTS: [(&str, &str, &str); 7] = [
    ("sodium", "Sodium", "mg"),
    ("potassium", "Potassium", "mg"),
    ("cholesterol", "Cholesterol", "mg"),
    ("vitamin a", "Vitamin A", "%"),
    ("vitamin c", "Vitamin C", "%"),
    ("calcium", "Calcium", "%"),
    ("iron", "Iron", "%"),
];

/// One nutrient line: `value / goal (pct%)` when a positive goal exists,
/// the bare value otherwise. Absent keys count as zero.
fn nutrient_line(
    totals: &Nutrients,
    goals: &Nutrients,
    key: &str,
    label: &str,
    unit: &str,
) -> String {
    let value = totals.get_or_zero(key);
    let goal = goals.get_or_zero(key);
    if goal > 0.0 {
        format!(
            "- **{}**: {:.0}{unit} / {:.0}{unit} ({:.0}%)\n",
            label,
            value,
            goal,
            value / goal * 100.0
        )
    } else {
        format!("- **{}**: {:.0}{}\n", label, value, unit)
    }
}

/// Render the macro and micronutrient report for `day`.
pub fn render(day: &Day) -> String {
    let totals = &day.totals;
    let goals = &day.goals;

    let mut out = format!("# Macros & Nutrients for {}\n\n", display_date(day.date));

    out.push_str("## Macronutrients\n");
    out.push_str(&nutrient_line(totals, goals, "calories", "Calories", "kcal"));
    out.push_str(&nutrient_line(totals, goals, "carbohydrates", "Carbohydrates", "g"));
    out.push_str(&nutrient_line(totals, goals, "protein", "Protein", "g"));
    out.push_str(&nutrient_line(totals, goals, "fat", "Fat", "g"));

    for (key, label) in FAT_BREAKDOWN {
        if let Some(amount) = totals.get(key) {
            out.push_str(&format!("  - {}: {:.1}g\n", label, amount));
        }
    }

    out.push_str(&nutrient_line(totals, goals, "fiber", "Fiber", "g"));
    out.push_str(&nutrient_line(totals, goals, "sugar", "Sugar", "g"));
    out.push('\n');

    out.push_str("## Micronutrients\n");
    for (key, label, unit) in MICRONUTRIENTS {
        if totals.contains(key) {
            out.push_str(&nutrient_line(totals, goals, key, label, unit));
        }
    }

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::diary::testing::{StubSource, nutrients, ymd};
    use crate::domains::tools::common::result_text;

    #[test]
    fn test_percent_only_with_positive_goal() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.totals = nutrients(&[("calories", 1500.0), ("protein", 90.0), ("fiber", 12.0)]);
        day.goals = nutrients(&[("calories", 2000.0), ("protein", 0.0), ("fiber", 30.0)]);

        let text = render(&day);
        assert!(text.contains("- **Calories**: 1500kcal / 2000kcal (75%)\n"));
        assert!(text.contains("- **Protein**: 90g\n"));
        assert!(text.contains("- **Fiber**: 12g / 30g (40%)\n"));
    }

    #[test]
    fn test_absent_macros_default_to_zero() {
        let text = render(&Day::empty(ymd(2024, 3, 15)));
        assert!(text.starts_with("# Macros & Nutrients for March 15, 2024\n\n## Macronutrients\n"));
        assert!(text.contains("- **Carbohydrates**: 0g\n"));
        assert!(text.contains("- **Sugar**: 0g\n"));
    }

    #[test]
    fn test_micronutrients_are_existence_gated() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.totals = nutrients(&[("sodium", 0.0), ("iron", 45.0)]);
        day.goals = nutrients(&[("sodium", 2300.0)]);

        let text = render(&day);
        assert!(text.contains("- **Sodium**: 0mg / 2300mg (0%)\n"));
        assert!(text.contains("- **Iron**: 45%\n"));
        assert!(!text.contains("Potassium"));
        assert!(!text.contains("Vitamin C"));
        assert!(text.ends_with(
            "## Micronutrients\n- **Sodium**: 0mg / 2300mg (0%)\n- **Iron**: 45%\n"
        ));
    }

    #[test]
    fn test_fat_breakdown_follows_fat_line() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.totals = nutrients(&[("fat", 60.0), ("saturated fat", 18.24), ("trans fat", 0.0)]);

        let text = render(&day);
        assert!(text.contains("- **Fat**: 60g\n  - Saturated: 18.2g\n  - Trans: 0.0g\n- **Fiber**"));
        assert!(!text.contains("Polyunsaturated"));
    }

    #[tokio::test]
    async fn test_execute_failure_subject() {
        let client = StubSource::new().into_client();
        let result = DailyMacrosTool::execute(&DateParams::for_date("2024-02-30"), &client).await;
        assert!(result_text(&result).starts_with("Error retrieving macros: Invalid date format"));
    }
}
