//! Configuration file support
//!
//! Settings come from three layers: built-in defaults, an optional
//! `logscan.toml`, and command-line flags. Later layers win.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use logscan_logs::MalformedLinePolicy;

use crate::report::OutputFormat;

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "logscan.toml";

/// Log file analyzed when none is configured
pub const DEFAULT_LOG_PATH: &str = "server.log";

/// Level used for the filtered listing when none is configured
pub const DEFAULT_LEVEL: &str = "ERROR";

/// One configuration layer; unset fields defer to lower layers
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub path: Option<PathBuf>,
    pub level: Option<String>,
    pub malformed: Option<MalformedLinePolicy>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Parse a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config file")
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, `logscan.toml` in the working
    /// directory is used if present, otherwise an empty layer is returned.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if !implicit.exists() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Layer `other` on top of `self`
    pub fn overlay(self, other: Config) -> Config {
        Config {
            path: other.path.or(self.path),
            level: other.level.or(self.level),
            malformed: other.malformed.or(self.malformed),
            format: other.format.or(self.format),
        }
    }

    /// Fill remaining gaps with defaults
    pub fn resolve(self) -> Settings {
        Settings {
            path: self.path.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
            level: self.level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
            malformed: self.malformed.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub path: PathBuf,
    pub level: String,
    pub malformed: MalformedLinePolicy,
    pub format: OutputFormat,
}
