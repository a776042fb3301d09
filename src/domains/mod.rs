//! Domains module containing business logic organized by bounded contexts.
//!
//! - `diary` talks to the remote food diary and models its records
//! - `tools` turns diary records into markdown reports exposed over MCP

pub mod diary;
pub mod tools;
