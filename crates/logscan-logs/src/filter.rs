use std::path::Path;

use logscan_types::LogLine;

use crate::error::Result;
use crate::source::LineSource;

/// Open a fresh source over `path` yielding only lines of the given level.
///
/// A line matches when it contains `,LEVEL,`, i.e. the level appears as a
/// whole comma-delimited field.
pub fn filter_by_level(
    path: impl AsRef<Path>,
    level: &str,
) -> Result<LevelFilter<LineSource>> {
    Ok(LevelFilter::new(LineSource::open(path)?, level))
}

/// Iterator adapter keeping lines that contain `,LEVEL,`. Errors pass through.
pub struct LevelFilter<I> {
    inner: I,
    needle: String,
}

impl<I> LevelFilter<I>
where
    I: Iterator<Item = Result<LogLine>>,
{
    pub fn new(inner: I, level: &str) -> Self {
        Self {
            inner,
            needle: format!(",{level},"),
        }
    }
}

impl<I> Iterator for LevelFilter<I>
where
    I: Iterator<Item = Result<LogLine>>,
{
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(line) if !line.contains(&self.needle) => continue,
                other => return Some(other),
            }
        }
    }
}
