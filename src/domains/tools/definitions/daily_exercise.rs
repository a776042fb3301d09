//! Daily exercise tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domains::diary::{Day, DiaryClient, display_date, parse_date};
use crate::domains::tools::common::{DateParams, guarded, tool_definition};

// ============================================================================
// Tool Definition
// ============================================================================

/// Daily exercise tool - every logged activity across categories.
pub struct DailyExerciseTool;

impl DailyExerciseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_daily_exercise";

    /// What the failure message says could not be retrieved.
    pub const SUBJECT: &'static str = "exercise";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get exercise activities: cardio (duration, calories) and strength (sets, reps, weight).";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = ?params.date))]
    pub async fn execute(params: &DateParams, client: &DiaryClient) -> CallToolResult {
        info!("Daily exercise tool called");
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

/// Render the exercise report for `day`.
///
/// Entries from every category are listed together. A duration or
/// calories line only appears when the value is present and non-zero.
pub fn render(day: &Day) -> String {
    let mut out = format!("# Exercise for {}\n\n", display_date(day.date));

    let entries: Vec<_> = day.exercise_entries().collect();
    if entries.is_empty() {
        out.push_str("No exercise logged for this day.\n");
        return out;
    }

    let mut total_minutes = 0.0;
    let mut total_calories = 0.0;

    for entry in entries {
        out.push_str(&format!("- **{}**\n", entry.name));

        if let Some(minutes) = entry.nutrition.get("minutes").filter(|m| *m != 0.0) {
            out.push_str(&format!("  - Duration: {:.0} minutes\n", minutes));
            total_minutes += minutes;
        }

        let calories = entry.nutrition.get_or_zero("calories burned");
        if calories != 0.0 {
            out.push_str(&format!("  - Calories Burned: {:.0} kcal\n", calories));
            total_calories += calories;
        }

        out.push('\n');
    }

    out.push_str("## Summary\n");
    if total_minutes > 0.0 {
        out.push_str(&format!("- **Total Duration**: {:.0} minutes\n", total_minutes));
    }
    if total_calories > 0.0 {
        out.push_str(&format!(
            "- **Total Calories Burned**: {:.0} kcal\n",
            total_calories
        ));
    }

    out
}

// ============================================================================
// Tests
// ============================================================================
