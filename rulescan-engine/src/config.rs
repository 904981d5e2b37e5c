//! Configuration for the rulescan engine
//!
//! Configuration sources are checked in order:
//! 1. Environment variable `RULESCAN_CONFIG` (highest precedence)
//! 2. `rulescan.toml` in the current directory
//! 3. Built-in defaults (lowest precedence)
//!
//! The merged configuration is read-only for the lifetime of a scanner;
//! the engine never mutates it after construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

/// Scan configuration
///
/// Defaults match the scanner's shipped policy: deep analysis on, a 10 MiB
/// file ceiling, at most 50 reported sections, and the file extensions AI
/// assistants commonly read rules from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Enable deep analysis
    ///
    /// Deep analysis adds homoglyph detection (lookalike Cyrillic/Greek
    /// letters), reported only when the document mixes scripts. Disabling
    /// it limits the scan to zero-width, bidirectional and control
    /// characters plus language patterns.
    #[serde(default = "default_true")]
    pub deep_analysis: bool,

    /// Maximum file size in bytes
    ///
    /// Enforced by the caller before invoking the engine; the engine itself
    /// scans whatever text it is handed.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Maximum number of suspicious sections to report
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,

    /// Minimum severity (1-5) a section must reach to be reported
    ///
    /// Filtering is the caller's responsibility; the engine returns all
    /// sections so hosts can apply their own threshold.
    #[serde(default = "default_min_severity")]
    pub min_severity: u8,

    /// File extensions to include in directory scans
    #[serde(default = "default_extensions")]
    pub include_extensions: Vec<String>,

    /// Custom suspicious-language patterns file (JSON)
    ///
    /// When set, replaces the built-in pattern table.
    #[serde(default)]
    pub custom_patterns: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            deep_analysis: default_true(),
            max_file_size: default_max_file_size(),
            max_sections: default_max_sections(),
            min_severity: default_min_severity(),
            include_extensions: default_extensions(),
            custom_patterns: None,
        }
    }
}

impl ScanConfig {
    /// Load configuration from the environment or the working directory,
    /// falling back to built-in defaults.
    pub fn load() -> EngineResult<Self> {
        if let Ok(path) = std::env::var("RULESCAN_CONFIG") {
            return Self::load_from_file(&PathBuf::from(path));
        }

        let local = PathBuf::from("rulescan.toml");
        if local.exists() {
            return Self::load_from_file(&local);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &PathBuf) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("{}: {e}", path.display())))
    }
}

const fn default_true() -> bool {
    true
}
const fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MiB
}
const fn default_max_sections() -> usize {
    50
}
const fn default_min_severity() -> u8 {
    1
}
fn default_extensions() -> Vec<String> {
    ["json", "yaml", "yml", "toml", "md", "txt", "cursor"]
        .iter()
        .map(ToString::to_string)
        .collect()
}
