//! Common utilities shared across the diary tools.
//!
//! This module provides the shared date parameter, unit conversions, and
//! the failure boundary every tool call runs inside.

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, Content, Tool};
use schemars::JsonSchema;
use serde::Deserialize;
use std::future::Future;
use tracing::warn;

use super::error::ToolError;

/// Milliliters per US fluid ounce.
pub const ML_PER_OZ: f64 = 29.5735;

/// Milliliters per US cup.
pub const ML_PER_CUP: f64 = 236.588;

/// Recommended daily water intake in ounces (8 cups / 2000 ml).
pub const RECOMMENDED_WATER_OZ: f64 = 64.0;

/// Parameters for tools that report on a single day.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct DateParams {
    /// Date to report on; today when omitted.
    #[schemars(description = "Date in YYYY-MM-DD format (defaults to today)")]
    #[serde(default)]
    pub date: Option<String>,
}

impl DateParams {
    pub fn for_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
        }
    }
}

pub fn ml_to_oz(ml: f64) -> f64 {
    ml / ML_PER_OZ
}

pub fn ml_to_cups(ml: f64) -> f64 {
    ml / ML_PER_CUP
}

/// A successful result holding a single plain-text block.
pub fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Run a tool body, turning any failure into an ordinary text response.
///
/// The protocol-level call always succeeds; failures read
/// `Error retrieving <subject>: <message>`.
pub async fn guarded<F>(subject: &str, body: F) -> CallToolResult
where
    F: Future<Output = Result<String, ToolError>>,
{
    match body.await {
        Ok(markdown) => text_result(markdown),
        Err(e) => {
            warn!("Failed to retrieve {}: {}", subject, e);
            text_result(format!("Error retrieving {}: {}", subject, e))
        }
    }
}

/// Build the Tool model (metadata) for a tool taking parameters `P`.
pub fn tool_definition<P>(name: &'static str, description: &'static str) -> Tool
where
    P: JsonSchema + 'static,
{
    Tool {
        name: name.into(),
        description: Some(description.into()),
        input_schema: cached_schema_for_type::<P>(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Decode tool arguments for the HTTP transport.
#[cfg(feature = "http")]
pub fn parse_http_arguments<P>(arguments: serde_json::Value) -> Result<P, String>
where
    P: serde::de::DeserializeOwned,
{
    let arguments = if arguments.is_null() {
        serde_json::json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Shape a tool result the way the HTTP transport returns it.
#[cfg(feature = "http")]
pub fn http_response(result: CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}

/// Extract the text of the first content block (tests only).
#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}
