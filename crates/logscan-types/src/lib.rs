//! Shared types for logscan
//!
//! This crate contains data structures used across multiple logscan crates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Substring that marks a line as an error line
pub const ERROR_MARKER: &str = "ERROR";

/// Marker preceding an embedded error code
pub const CODE_MARKER: &str = "code=";

/// Distinct level tokens, ordered for stable output
pub type LevelSet = BTreeSet<String>;

/// Level token -> number of lines containing it
pub type LevelCounts = BTreeMap<String, usize>;

/// Raw `code=` suffix -> number of error lines containing it
pub type ErrorCodeCounts = BTreeMap<String, usize>;

// ============================================================================
// Log Lines
// ============================================================================

/// A single trimmed line read from a log file
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// 1-based line number within the source file
    pub line_number: u64,

    /// Line text, trimmed of surrounding whitespace
    pub raw: String,
}

impl LogLine {
    pub fn new(line_number: u64, raw: String) -> Self {
        Self { line_number, raw }
    }

    /// The level token: the second comma-delimited field.
    ///
    /// Returns `None` when the line has no comma at all.
    pub fn level_field(&self) -> Option<&str> {
        self.raw.split(',').nth(1)
    }

    /// Whether the line mentions `ERROR` anywhere in its text
    pub fn is_error(&self) -> bool {
        self.raw.contains(ERROR_MARKER)
    }

    /// Text after the first `code=` marker, up to the next marker if the line
    /// repeats it.
    pub fn code_suffix(&self) -> Option<&str> {
        self.raw.split(CODE_MARKER).nth(1)
    }

    /// Whether `needle` appears anywhere in the line
    pub fn contains(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// Analysis Results
// ============================================================================

/// Result of a full analysis pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogAnalysis {
    /// Lines containing `ERROR`, in file order
    pub error_logs: Vec<LogLine>,

    /// Distinct level tokens
    pub levels: LevelSet,

    /// Substring containment count per level
    pub level_counts: LevelCounts,
}

impl LogAnalysis {
    /// Raw text of the error lines
    pub fn error_texts(&self) -> Vec<&str> {
        self.error_logs.iter().map(|l| l.raw.as_str()).collect()
    }
}

/// How to treat a line without a level field when building the level set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Leave the line out of the level set
    #[default]
    Skip,
    /// Treat the line's level as the empty string
    Empty,
    /// Abort the analysis
    Fail,
}

impl MalformedLinePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Empty => "empty",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for MalformedLinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "empty" => Ok(Self::Empty),
            "fail" => Ok(Self::Fail),
            other => Err(format!(
                "unknown malformed line policy '{other}' (expected skip, empty or fail)"
            )),
        }
    }
}

impl fmt::Display for MalformedLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(raw: &str) -> LogLine {
        LogLine::new(1, raw.to_string())
    }

    #[test]
    fn test_level_field() {
        assert_eq!(line("2024-01-01,INFO,service up").level_field(), Some("INFO"));
        assert_eq!(line("2024-01-01,").level_field(), Some(""));
        assert_eq!(line("no commas here").level_field(), None);
    }

    #[test]
    fn test_code_suffix_is_raw_tail() {
        let l = line("2024-01-02,ERROR,code=500 timeout");
        assert_eq!(l.code_suffix(), Some("500 timeout"));
        assert_eq!(line("2024-01-02,ERROR,boom").code_suffix(), None);
    }

    #[test]
    fn test_code_suffix_stops_at_repeated_marker() {
        let l = line("x,ERROR,code=1 retry code=2");
        assert_eq!(l.code_suffix(), Some("1 retry "));
    }

    #[test]
    fn test_error_marker_is_substring() {
        let l = line("2024-01-01,INFO,ERROR in body");
        assert_eq!(l.level_field(), Some("INFO"));
        assert!(l.is_error());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("SKIP".parse::<MalformedLinePolicy>(), Ok(MalformedLinePolicy::Skip));
        assert_eq!("fail".parse::<MalformedLinePolicy>(), Ok(MalformedLinePolicy::Fail));
        assert!("drop".parse::<MalformedLinePolicy>().is_err());
    }
}
