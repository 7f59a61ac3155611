use std::path::Path;

use logscan_types::{
    ErrorCodeCounts, LevelCounts, LevelSet, LogAnalysis, LogLine, MalformedLinePolicy,
};

use crate::error::{LogError, Result};
use crate::source::LineSource;

/// Read the whole file once and compute error lines, levels and level counts
pub fn analyze_file(path: impl AsRef<Path>, policy: MalformedLinePolicy) -> Result<LogAnalysis> {
    let lines = LineSource::open(path)?.collect::<Result<Vec<_>>>()?;
    tracing::debug!(lines = lines.len(), "materialized log for analysis");
    analyze_lines(&lines, policy)
}

/// Analyze an already materialized sequence of lines
pub fn analyze_lines(lines: &[LogLine], policy: MalformedLinePolicy) -> Result<LogAnalysis> {
    let levels = level_set(lines, policy)?;
    let level_counts = count_levels(lines, &levels);

    Ok(LogAnalysis {
        error_logs: error_logs(lines),
        levels,
        level_counts,
    })
}

/// Lines containing `ERROR` anywhere, in order
pub fn error_logs(lines: &[LogLine]) -> Vec<LogLine> {
    lines.iter().filter(|l| l.is_error()).cloned().collect()
}

/// Distinct values of the second comma-delimited field
pub fn level_set(lines: &[LogLine], policy: MalformedLinePolicy) -> Result<LevelSet> {
    let mut levels = LevelSet::new();

    for line in lines {
        match (line.level_field(), policy) {
            (Some(level), _) => {
                levels.insert(level.to_string());
            }
            (None, MalformedLinePolicy::Skip) => {
                tracing::warn!(line = line.line_number, "skipping line without level field");
            }
            (None, MalformedLinePolicy::Empty) => {
                levels.insert(String::new());
            }
            (None, MalformedLinePolicy::Fail) => {
                return Err(LogError::MalformedLine {
                    line_number: line.line_number,
                    line: line.raw.clone(),
                });
            }
        }
    }

    Ok(levels)
}

/// Count, for each level, the lines that contain it as a substring.
///
/// This is a containment count, not a field comparison: a line counts towards
/// every level that appears anywhere in its text. All levels are tallied in a
/// single pass over the lines.
pub fn count_levels(lines: &[LogLine], levels: &LevelSet) -> LevelCounts {
    let mut counts: LevelCounts = levels.iter().map(|l| (l.clone(), 0)).collect();

    for line in lines {
        for (level, count) in counts.iter_mut() {
            if line.contains(level) {
                *count += 1;
            }
        }
    }

    counts
}

/// Read the file again, keeping only error lines, and count their codes
pub fn error_code_count(path: impl AsRef<Path>) -> Result<ErrorCodeCounts> {
    let mut source = LineSource::open(path)?;
    let mut errors = Vec::new();
    for line in source.by_ref() {
        let line = line?;
        if line.is_error() {
            errors.push(line);
        }
    }
    tracing::debug!(
        lines = source.lines_read(),
        error_lines = errors.len(),
        "collected error lines"
    );

    Ok(count_error_codes(&errors))
}

/// Map each raw `code=` suffix to the number of error lines containing it.
///
/// Lines without the marker contribute no key. The suffix is used as-is, so
/// only lines sharing an identical tail end up under the same key.
pub fn count_error_codes(error_lines: &[LogLine]) -> ErrorCodeCounts {
    let mut counts = ErrorCodeCounts::new();

    for suffix in error_lines.iter().filter_map(LogLine::code_suffix) {
        if counts.contains_key(suffix) {
            continue;
        }
        let n = error_lines.iter().filter(|l| l.contains(suffix)).count();
        counts.insert(suffix.to_string(), n);
    }

    counts
}
