//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::diary::DiaryClient;

use super::definitions::{
    DailyExerciseTool, DailyMacrosTool, DailyMealsTool, DailySummaryTool, DateRangeSummaryTool,
    WaterIntakeTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<DiaryClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(DailySummaryTool::create_route(client.clone()))
        .with_route(DailyMealsTool::create_route(client.clone()))
        .with_route(DailyExerciseTool::create_route(client.clone()))
        .with_route(DailyMacrosTool::create_route(client.clone()))
        .with_route(WaterIntakeTool::create_route(client.clone()))
        .with_route(DateRangeSummaryTool::create_route(client))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::diary::testing::StubSource;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(StubSource::new().into_client());
        let tools = router.list_all();
        assert_eq!(tools.len(), 6);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"get_daily_summary"));
        assert!(names.contains(&"get_daily_meals"));
        assert!(names.contains(&"get_daily_exercise"));
        assert!(names.contains(&"get_daily_macros"));
        assert!(names.contains(&"get_water_intake"));
        assert!(names.contains(&"get_date_range_summary"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let client = StubSource::new().into_client();
        let registry = ToolRegistry::new(client.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(client);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_range_tool_requires_both_bounds() {
        let tool = DateRangeSummaryTool::to_tool();
        let required = tool.input_schema.get("required").and_then(|r| r.as_array()).unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&serde_json::json!("start_date")));
        assert!(required.contains(&serde_json::json!("end_date")));

        let tool = DailySummaryTool::to_tool();
        assert!(tool.input_schema.get("required").is_none());
    }
}
