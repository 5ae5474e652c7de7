//! Per-cycle reports, stage timings and session statistics.
//!
//! Everything here is `Serialize` (camelCase) so tools can dump a whole
//! session as JSON.

pub mod report;
pub mod stats;
pub mod timing;

pub use report::CycleReport;
pub use stats::SessionStats;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
