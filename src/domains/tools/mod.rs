//! Tools domain module.
//!
//! Every tool fetches diary data through the shared [`DiaryClient`] and
//! returns a markdown report. Failures never escape as protocol errors: the
//! call succeeds and the text reads `Error retrieving <subject>: <message>`.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `common.rs` - Shared parameters, unit conversions, failure boundary
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `weekly_goals.rs`)
//! 2. Define NAME, SUBJECT, execute(), render() and http_handler()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` for HTTP support
//!
//! [`DiaryClient`]: crate::domains::diary::DiaryClient

pub mod common;
pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
