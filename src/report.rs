//! Console report rendering

use std::io::{self, Write};

use serde::Deserialize;
use serde_json::{Map, Value, json};

use logscan_logs::{ErrorCodeCounts, LogAnalysis, LogLine, Timing};

/// Name reported for the full analysis pass
pub const ANALYZE_LOGS: &str = "analyze_logs";

/// Name reported for the error code pass
pub const ERROR_CODE_COUNT: &str = "error_code_count";

/// Output format of the report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable sections
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Writes report sections as each pass produces them.
///
/// Text output goes straight to the writer, so a failing pass still leaves
/// everything before it on screen. JSON output is gathered and written by
/// [`Reporter::finish`].
pub struct Reporter<W: Write> {
    out: W,
    format: OutputFormat,
    timings: Map<String, Value>,
    doc: Map<String, Value>,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            timings: Map::new(),
            doc: Map::new(),
        }
    }

    pub fn timing(&mut self, timing: &Timing) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{timing}"),
            OutputFormat::Json => {
                self.timings.insert(timing.name.clone(), json!(timing.seconds()));
                Ok(())
            }
        }
    }

    pub fn analysis(&mut self, analysis: &LogAnalysis) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "\n--- Log Analysis ---")?;
                writeln!(self.out, "Error Logs: {:?}", analysis.error_texts())?;
                writeln!(self.out, "Unique Levels: {:?}", analysis.levels)?;
                writeln!(self.out, "Log Counts: {:?}", analysis.level_counts)
            }
            OutputFormat::Json => {
                self.doc.insert("analysis".to_string(), json!(analysis));
                Ok(())
            }
        }
    }

    pub fn filtered_header(&mut self, level: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "\n--- Filtered {level} Logs ---"),
            OutputFormat::Json => {
                self.doc.insert("level".to_string(), json!(level));
                self.doc.insert("filtered".to_string(), json!([]));
                Ok(())
            }
        }
    }

    pub fn filtered_line(&mut self, line: &LogLine) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{line}"),
            OutputFormat::Json => {
                if let Some(Value::Array(lines)) = self.doc.get_mut("filtered") {
                    lines.push(json!(line));
                }
                Ok(())
            }
        }
    }

    pub fn error_codes_header(&mut self) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "\n--- Error Code Count ---"),
            OutputFormat::Json => Ok(()),
        }
    }

    pub fn error_codes(&mut self, codes: &ErrorCodeCounts) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{codes:?}"),
            OutputFormat::Json => {
                self.doc.insert("error_codes".to_string(), json!(codes));
                Ok(())
            }
        }
    }

    /// Emit anything still buffered and hand back the writer
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            let timings = std::mem::take(&mut self.timings);
            self.doc.insert("timings".to_string(), Value::Object(timings));
            serde_json::to_writer_pretty(&mut self.out, &self.doc)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
