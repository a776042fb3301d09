//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::domains::diary::DiaryClient;

use super::definitions::{
    DailyExerciseTool, DailyMacrosTool, DailyMealsTool, DailySummaryTool, DateRangeSummaryTool,
    WaterIntakeTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub struct ToolRegistry {
    client: Arc<DiaryClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<DiaryClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            DailySummaryTool::NAME,
            DailyMealsTool::NAME,
            DailyExerciseTool::NAME,
            DailyMacrosTool::NAME,
            WaterIntakeTool::NAME,
            DateRangeSummaryTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO/TCP transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            DailySummaryTool::to_tool(),
            DailyMealsTool::to_tool(),
            DailyExerciseTool::to_tool(),
            DailyMacrosTool::to_tool(),
            WaterIntakeTool::to_tool(),
            DateRangeSummaryTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// `Err` is reserved for unknown tools and undecodable arguments; a
    /// failed fetch still comes back as `Ok` with an error message as text.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let client = self.client.clone();
        match name {
            DailySummaryTool::NAME => DailySummaryTool::http_handler(arguments, client).await,
            DailyMealsTool::NAME => DailyMealsTool::http_handler(arguments, client).await,
            DailyExerciseTool::NAME => DailyExerciseTool::http_handler(arguments, client).await,
            DailyMacrosTool::NAME => DailyMacrosTool::http_handler(arguments, client).await,
            WaterIntakeTool::NAME => WaterIntakeTool::http_handler(arguments, client).await,
            DateRangeSummaryTool::NAME => {
                DateRangeSummaryTool::http_handler(arguments, client).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(format!("Unknown tool: {}", name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::diary::testing::StubSource;

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(StubSource::new().into_client());
        let names = registry.tool_names();
        assert_eq!(names.len(), 6);
        assert!(names.contains(&"get_daily_summary"));
        assert!(names.contains(&"get_date_range_summary"));
        assert_eq!(ToolRegistry::get_all_tools().len(), names.len());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_water() {
        let registry = ToolRegistry::new(StubSource::new().into_client());
        let result = registry
            .call_tool("get_water_intake", serde_json::json!({ "date": "2024-03-15" }))
            .await
            .unwrap();

        assert_eq!(result["isError"], false);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("# Water Intake for March 15, 2024"));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_null_arguments_mean_today() {
        let registry = ToolRegistry::new(StubSource::new().into_client());
        let result = registry
            .call_tool("get_daily_summary", serde_json::Value::Null)
            .await;
        assert!(result.is_ok());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(StubSource::new().into_client());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_missing_range_bound() {
        let registry = ToolRegistry::new(StubSource::new().into_client());
        let result = registry
            .call_tool("get_date_range_summary", serde_json::json!({ "start_date": "2024-01-01" }))
            .await;
        assert!(result.unwrap_err().starts_with("Invalid arguments"));
    }
}
