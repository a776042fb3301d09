//! Water intake tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domains::diary::{Day, DiaryClient, display_date, parse_date};
use crate::domains::tools::common::{
    DateParams, RECOMMENDED_WATER_OZ, guarded, ml_to_cups, ml_to_oz, tool_definition,
};

// ============================================================================
// Tool Definition
// ============================================================================

/// Water intake tool - consumption against the recommended amount.
pub struct WaterIntakeTool;

impl WaterIntakeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_water_intake";

    /// What the failure message says could not be retrieved.
    pub const SUBJECT: &'static str = "water intake";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get water consumption for a specific day.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(date = ?params.date))]
    pub async fn execute(params: &DateParams, client: &DiaryClient) -> CallToolResult {
        info!("Water intake tool called");
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

/// Render the water intake report for `day`.
pub fn render(day: &Day) -> String {
    let ml = day.water_ml;
    let oz = ml_to_oz(ml);

    let mut out = format!("# Water Intake for {}\n\n", display_date(day.date));

    if ml > 0.0 {
        out.push_str(&format!(
            "**Amount**: {:.0} oz ({:.1} cups / {:.0} ml)\n",
            oz,
            ml_to_cups(ml),
            ml
        ));
    } else {
        out.push_str("No water intake logged for this day.\n");
    }

    out.push_str("\n*Recommended daily intake: 64 oz (8 cups / 2000 ml)*\n");

    if ml > 0.0 {
        out.push_str(&format!(
            "*Progress: {:.0}% of recommended amount*\n",
            oz / RECOMMENDED_WATER_OZ * 100.0
        ));
    }

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::diary::testing::{StubSource, ymd};
    use crate::domains::tools::common::result_text;

    #[test]
    fn test_render_amount_and_progress() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.water_ml = 2000.0;

        assert_eq!(
            render(&day),
            "# Water Intake for March 15, 2024\n\n\
             **Amount**: 68 oz (8.5 cups / 2000 ml)\n\
             \n*Recommended daily intake: 64 oz (8 cups / 2000 ml)*\n\
             *Progress: 106% of recommended amount*\n"
        );
    }

    #[test]
    fn test_render_nothing_logged() {
        let text = render(&Day::empty(ymd(2024, 3, 15)));
        assert!(text.contains("No water intake logged for this day.\n"));
        assert!(text.contains("*Recommended daily intake: 64 oz (8 cups / 2000 ml)*"));
        assert!(!text.contains("Progress"));
    }

    #[tokio::test]
    async fn test_execute_fetches_requested_day() {
        let mut day = Day::empty(ymd(2024, 3, 15));
        day.water_ml = 1500.0;
        let client = StubSource::new().with_day(day).into_client();

        let result = WaterIntakeTool::execute(&DateParams::for_date("2024-03-15"), &client).await;
        assert!(result_text(&result).contains("**Amount**: 51 oz (6.3 cups / 1500 ml)"));
    }

    #[tokio::test]
    async fn test_execute_failure_subject() {
        let client = StubSource::new().failing_on(ymd(2024, 3, 15)).into_client();
        let result = WaterIntakeTool::execute(&DateParams::for_date("2024-03-15"), &client).await;
        assert!(result_text(&result).starts_with("Error retrieving water intake: "));
    }
}
