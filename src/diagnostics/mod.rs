//! Structured summary of a preparation run, serialised to JSON by the CLI.
mod report;
mod timing;

pub use report::{ClassCounts, PreparationReport, ReferenceSummary, StrategySummary};
pub use timing::{StageTiming, TimingBreakdown};
