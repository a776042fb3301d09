//! Date range summary tool definition.
//!
//! Fetches every day of an inclusive range, skipping days that fail, and
//! reports averages, tracking stats and a one-line breakdown per day.
//! All ratios use the number of days actually fetched, which can be lower
//! than the length of the range.

use chrono::NaiveDate;
use futures::{FutureExt, StreamExt};
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domains::diary::dates::DATE_FORMAT;
use crate::domains::diary::{Day, DiaryClient, display_date, parse_date};
use crate::domains::tools::ToolError;
use crate::domains::tools::common::{guarded, ml_to_oz, tool_definition};

// ============================================================================
// Parameters
// ============================================================================

/// Parameters for the date range summary tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DateRangeParams {
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: String,

    #[schemars(description = "End date in YYYY-MM-DD format")]
    pub end_date: String,
}

impl DateRangeParams {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Date range summary tool - multi-day aggregate report.
pub struct DateRangeSummaryTool;

impl DateRangeSummaryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_date_range_summary";

    /// What the failure message says could not be retrieved.
    pub const SUBJECT: &'static str = "date range summary";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get aggregate nutrition data over a date range with trends and insights.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(start = %params.start_date, end = %params.end_date))]
    pub async fn execute(params: &DateRangeParams, client: &DiaryClient) -> CallToolResult {
        info!("Date range summary tool called");
        guarded(Self::SUBJECT, async {
            let start = parse_date(Some(params.start_date.as_str()))?;
            let end = parse_date(Some(params.end_date.as_str()))?;
            if start > end {
                return Err(ToolError::validation(
                    "Start date must be before or equal to end date",
                ));
            }

            let snapshots: Vec<DaySnapshot> = client
                .fetch_range(start, end)
                .map(|day| DaySnapshot::from(&day))
                .collect()
                .await;
            debug!("Collected {} days", snapshots.len());

            Ok(render(start, end, &snapshots))
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

        let params: DateRangeParams = parse_http_arguments(arguments)?;
        Ok(http_response(Self::execute(&params, &client).await))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        tool_definition::<DateRangeParams>(Self::NAME, Self::DESCRIPTION)
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
                let params: DateRangeParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &client).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// The per-day figures the range report needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub calories: f64,
    pub carbs: f64,
    pub fat: f64,
    pub protein: f64,
    pub water_ml: f64,
    pub complete: bool,
    pub meals: usize,
    /// Logged activities summed over every exercise category, not the category count.
    pub exercises: usize,
}

impl From<&Day> for DaySnapshot {
    fn from(day: &Day) -> Self {
        Self {
            date: day.date,
            calories: day.totals.get_or_zero("calories"),
            carbs: day.totals.get_or_zero("carbohydrates"),
            fat: day.totals.get_or_zero("fat"),
            protein: day.totals.get_or_zero("protein"),
            water_ml: day.water_ml,
            complete: day.complete,
            meals: day.meals.len(),
            exercises: day.exercise_entries().count(),
        }
    }
}

fn mean(snapshots: &[DaySnapshot], field: impl Fn(&DaySnapshot) -> f64) -> f64 {
    snapshots.iter().map(field).sum::<f64>() / snapshots.len() as f64
}

fn percent(count: usize, total: usize) -> f64 {
    count as f64 / total as f64 * 100.0
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the range report. `start` and `end` are the requested bounds;
/// `snapshots` holds only the days that were fetched successfully.
pub fn render(start: NaiveDate, end: NaiveDate, snapshots: &[DaySnapshot]) -> String {
    if snapshots.is_empty() {
        return "No data available for the specified date range.".to_string();
    }

    let days = snapshots.len();
    let avg_water_ml = mean(snapshots, |d| d.water_ml);
    let complete_days = snapshots.iter().filter(|d| d.complete).count();
    let exercise_days = snapshots.iter().filter(|d| d.exercises > 0).count();

    let mut out = String::from("# Date Range Summary\n");
    out.push_str(&format!(
        "**{}** to **{}**\n",
        display_date(start),
        display_date(end)
    ));
    out.push_str(&format!("({} days)\n\n", days));

    out.push_str("## Daily Averages\n");
    out.push_str(&format!(
        "- **Calories**: {:.0} kcal/day\n",
        mean(snapshots, |d| d.calories)
    ));
    out.push_str(&format!(
        "- **Carbohydrates**: {:.0}g/day\n",
        mean(snapshots, |d| d.carbs)
    ));
    out.push_str(&format!("- **Fat**: {:.0}g/day\n", mean(snapshots, |d| d.fat)));
    out.push_str(&format!(
        "- **Protein**: {:.0}g/day\n",
        mean(snapshots, |d| d.protein)
    ));
    out.push_str(&format!(
        "- **Water**: {:.0} oz/day ({:.0} ml/day)\n\n",
        ml_to_oz(avg_water_ml),
        avg_water_ml
    ));

    out.push_str("## Tracking Stats\n");
    out.push_str(&format!(
        "- **Days Completed**: {}/{} ({:.0}%)\n",
        complete_days,
        days,
        percent(complete_days, days)
    ));
    out.push_str(&format!(
        "- **Days with Exercise**: {}/{} ({:.0}%)\n\n",
        exercise_days,
        days,
        percent(exercise_days, days)
    ));

    out.push_str("## Daily Breakdown\n");
    for day in snapshots {
        out.push_str(&format!(
            "- **{}**: {:.0} kcal, {:.0}C/{:.0}F/{:.0}P, {:.0} oz water",
            day.date.format(DATE_FORMAT),
            day.calories,
            day.carbs,
            day.fat,
            day.protein,
            ml_to_oz(day.water_ml)
        ));

        let mut status = Vec::new();
        if day.complete {
            status.push("✓".to_string());
        }
        if day.exercises > 0 {
            status.push(format!("{} exercises", day.exercises));
        }
        if !status.is_empty() {
            out.push_str(&format!(" [{}]", status.join(", ")));
        }
        out.push('\n');
    }

    out
}

// ============================================================================
// Tests
// ============================================================================
