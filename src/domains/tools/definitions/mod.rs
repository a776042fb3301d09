//! Tool definitions module.
//!
//! One file per tool. Each renders a markdown report from diary data.

pub mod daily_exercise;
pub mod daily_macros;
pub mod daily_meals;
pub mod daily_summary;
pub mod date_range_summary;
pub mod water_intake;

pub use daily_exercise::DailyExerciseTool;
pub use daily_macros::DailyMacrosTool;
pub use daily_meals::DailyMealsTool;
pub use daily_summary::DailySummaryTool;
pub use date_range_summary::{DateRangeParams, DateRangeSummaryTool};
pub use water_intake::WaterIntakeTool;
