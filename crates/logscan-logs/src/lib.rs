//! Log processing for logscan
//!
//! This crate provides line sources, level filtering, aggregate analyzers and
//! the timing wrapper used around them.

mod analyze;
mod error;
mod filter;
mod source;
pub mod timing;

pub use analyze::{
    analyze_file, analyze_lines, count_error_codes, count_levels, error_code_count, error_logs,
    level_set,
};
pub use error::{LogError, Result};
pub use filter::{LevelFilter, filter_by_level};
pub use source::LineSource;
pub use timing::{Timing, timed};

// Re-export types used in our public API
pub use logscan_types::{
    ErrorCodeCounts, LevelCounts, LevelSet, LogAnalysis, LogLine, MalformedLinePolicy,
};
