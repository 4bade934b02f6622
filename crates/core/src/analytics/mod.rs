//! Per-student performance analytics.

mod summary;

pub use summary::{summarize, PerformanceSummary, ProgressPoint, TopicScore, PROGRESS_WINDOW};
