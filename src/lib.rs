//! MyFitnessPal MCP Server Library
//!
//! Exposes a MyFitnessPal food diary as a set of Model Context Protocol
//! tools. Every tool returns a markdown report for one day or a range of
//! days.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **diary**: session cookies, date parsing, the account client and data model
//!   - **tools**: the six report tools and their registration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mfp_mcp_server::{core::Config, core::McpServer, domains::diary::DiaryClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let client = DiaryClient::connect(&config.diary).await?;
//!     let server = McpServer::new(config, Arc::new(client));
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
