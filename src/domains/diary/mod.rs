//! Diary domain module.
//!
//! Everything needed to turn a tool argument into fetched diary data:
//!
//! - `model` - Day, Meal, Entry, Exercise and the nutrient mapping
//! - `dates` - strict `YYYY-MM-DD` argument parsing
//! - `cookies` - session cookie reconstruction
//! - `client` - the shared account client and its `DiarySource` seam
//! - `http` - the remote source talking to the service

pub mod client;
pub mod cookies;
pub mod dates;
mod error;
pub mod http;
pub mod model;

#[cfg(test)]
pub mod testing;

pub use client::{DiaryClient, DiarySource};
pub use cookies::{Cookie, CookieStore};
pub use dates::{display_date, parse_date};
pub use error::{DiaryError, DiaryResult};
pub use model::{Day, Entry, Exercise, Meal, Nutrients};
