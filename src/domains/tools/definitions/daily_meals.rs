//! Daily meals tool definition.
//!
//! Meal-by-meal breakdown with every logged food, its serving and macros.

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

/// Daily meals tool - foods grouped by meal.
pub struct DailyMealsTool;

impl DailyMealsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_daily_meals";

    /// What the failure message says could not be retrieved.
    pub const SUBJECT: &'static str = "meals";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get detailed meal-by-meal breakdown with all foods, servings, and calories.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = ?params.date))]
    pub async fn execute(params: &DateParams, client: &DiaryClient) -> CallToolResult {
        info!("Daily meals tool called");
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

/// "54C / 6F / 10P" grams, rounded.
fn macro_triplet(nutrients: &Nutrients) -> String {
    format!(
        "{:.0}C / {:.0}F / {:.0}P",
        nutrients.get_or_zero("carbohydrates"),
        nutrients.get_or_zero("fat"),
        nutrients.get_or_zero("protein")
    )
}

/// Render the meal breakdown report for `day`.
pub fn render(day: &Day) -> String {
    let mut out = format!("# Meals for {}\n\n", display_date(day.date));

    if day.meals.is_empty() {
        out.push_str("No meals logged for this day.\n");
        return out;
    }

    for meal in &day.meals {
        out.push_str(&format!("## {}\n", meal.name));
        out.push_str(&format!(
            "**Total**: {:.0} kcal ({})\n\n",
            meal.totals.get_or_zero("calories"),
            macro_triplet(&meal.totals)
        ));

        if meal.entries.is_empty() {
            out.push_str("No foods logged in this meal.\n\n");
            continue;
        }

        for entry in &meal.entries {
            out.push_str(&format!("- **{}**\n", entry.name));
            out.push_str(&format!("  - Serving: {} {}\n", entry.quantity, entry.unit));
            out.push_str(&format!(
                "  - Calories: {:.0} kcal\n",
                entry.nutrition.get_or_zero("calories")
            ));
            out.push_str(&format!("  - Macros: {}\n", macro_triplet(&entry.nutrition)));
        }
        out.push('\n');
    }

    out
}

// ============================================================================
// Tests
// ============================================================================
