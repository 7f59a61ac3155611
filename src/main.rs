mod config;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use logscan_logs::{MalformedLinePolicy, analyze_file, error_code_count, filter_by_level, timed};

use crate::config::Config;
use crate::report::{ANALYZE_LOGS, ERROR_CODE_COUNT, OutputFormat, Reporter};

/// Logscan - aggregate views over comma-delimited log files
#[derive(Parser, Debug)]
#[command(name = "logscan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log file to analyze (default: server.log)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Level shown in the filtered listing (default: ERROR)
    #[arg(short, long)]
    level: Option<String>,

    /// Config file (default: ./logscan.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// What to do with lines lacking a level field: skip, empty or fail
    #[arg(long, value_name = "POLICY")]
    malformed: Option<MalformedLinePolicy>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Args {
    /// The command line as the topmost config layer
    fn overrides(&self) -> Config {
        Config {
            path: self.file.clone(),
            level: self.level.clone(),
            malformed: self.malformed,
            format: self.format,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args, io::stdout().lock()).map(|_| ());

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn run<W: Write>(args: Args, out: W) -> Result<W> {
    let settings = Config::load(args.config.as_deref())?
        .overlay(args.overrides())
        .resolve();

    tracing::debug!(
        path = %settings.path.display(),
        level = %settings.level,
        malformed = %settings.malformed,
        "resolved settings"
    );

    let mut reporter = Reporter::new(out, settings.format);

    let mut written = Ok(());
    let analysis = timed(
        ANALYZE_LOGS,
        |t| written = reporter.timing(t),
        || analyze_file(&settings.path, settings.malformed),
    );
    written?;
    let analysis =
        analysis.with_context(|| format!("failed to analyze {}", settings.path.display()))?;
    reporter.analysis(&analysis)?;

    reporter.filtered_header(&settings.level)?;
    for line in filter_by_level(&settings.path, &settings.level)? {
        let line = line.with_context(|| format!("failed to filter {}", settings.path.display()))?;
        reporter.filtered_line(&line)?;
    }

    reporter.error_codes_header()?;
    let mut written = Ok(());
    let error_codes = timed(
        ERROR_CODE_COUNT,
        |t| written = reporter.timing(t),
        || error_code_count(&settings.path),
    );
    written?;
    let error_codes = error_codes
        .with_context(|| format!("failed to count error codes in {}", settings.path.display()))?;
    reporter.error_codes(&error_codes)?;

    Ok(reporter.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = "\
2024-01-01,INFO,service up
2024-01-02,WARN,disk at 91%
2024-01-03,ERROR,code=500 timeout
2024-01-04,ERROR,code=404 not found
";

    fn run_with(argv: &[&str]) -> (Result<()>, String) {
        let mut full = vec!["logscan"];
        full.extend_from_slice(argv);
        let args = Args::try_parse_from(full).unwrap();

        let mut out = Vec::new();
        let result = run(args, &mut out).map(|_| ());
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_run_text_report_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("server.log");
        fs::write(&log, SAMPLE).unwrap();

        let (result, text) = run_with(&[log.to_str().unwrap()]);
        assert!(result.is_ok());

        assert!(text.starts_with("Execution time of analyze_logs: "));
        assert!(text.contains("Unique Levels: {\"ERROR\", \"INFO\", \"WARN\"}"));
        assert!(text.contains("Log Counts: {\"ERROR\": 2, \"INFO\": 1, \"WARN\": 1}"));
        assert!(text.contains(
            "--- Filtered ERROR Logs ---\n\
             2024-01-03,ERROR,code=500 timeout\n\
             2024-01-04,ERROR,code=404 not found\n"
        ));
        assert!(text.contains("--- Error Code Count ---\nExecution time of error_code_count: "));
        assert!(text.ends_with("{\"404 not found\": 1, \"500 timeout\": 1}\n"));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("app.log");
        fs::write(&log, SAMPLE).unwrap();
        let config = dir.path().join("logscan.toml");
        fs::write(
            &config,
            format!(
                "path = {:?}\nlevel = \"INFO\"\nformat = \"json\"\n",
                log.to_str().unwrap()
            ),
        )
        .unwrap();

        // Path and format come from the config, the level from the command line
        let (result, text) = run_with(&["--config", config.to_str().unwrap(), "--level", "WARN"]);
        assert!(result.is_ok());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["filtered"].as_array().unwrap().len(), 1);
        assert_eq!(value["filtered"][0]["raw"], "2024-01-02,WARN,disk at 91%");
        assert_eq!(value["analysis"]["level_counts"]["ERROR"], 2);
    }

    #[test]
    fn test_missing_file_still_reports_timing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("server.log");

        let (result, text) = run_with(&[missing.to_str().unwrap()]);
        assert!(result.is_err());
        assert!(text.starts_with("Execution time of analyze_logs: "));
        assert!(!text.contains("--- Log Analysis ---"));
    }

    #[test]
    fn test_malformed_fail_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("server.log");
        fs::write(&log, "2024-01-01,INFO,ok\nno level here\n").unwrap();

        let (result, _) = run_with(&[log.to_str().unwrap(), "--malformed", "fail"]);
        let err = format!("{:#}", result.unwrap_err());
        assert!(err.contains("line 2 has no level field"));
    }
}
