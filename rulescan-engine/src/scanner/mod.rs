//! Content analysis for AI rules files
//!
//! The pipeline: the Unicode scanner and the pattern matcher run
//! independently over the raw text, the section builder merges their
//! findings into disjoint ranked sections, the severity scorer reduces
//! everything to a 0-5 risk score, and the report generator derives the
//! summary and recommendations. One immutable [`ScanResult`] comes out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod patterns;
pub mod report;
pub mod sanitize;
pub mod sections;
pub mod severity;
pub mod tables;
pub mod unicode;

use crate::config::ScanConfig;
use crate::error::EngineResult;
use patterns::{PatternMatcher, SuspiciousPatterns};

/// Category of a suspicious character
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CharCategory {
    /// Rendered with no visible glyph
    ZeroWidth,
    /// Alters left-to-right/right-to-left rendering order
    BidiControl,
    /// C0/C1 control codes and separators that can break or hide content
    Control,
    /// Lookalike letters from other scripts
    Homoglyph,
}

impl fmt::Display for CharCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWidth => write!(f, "zero-width"),
            Self::BidiControl => write!(f, "bidi-control"),
            Self::Control => write!(f, "control"),
            Self::Homoglyph => write!(f, "homoglyph"),
        }
    }
}

/// A single flagged character occurrence
///
/// `position` is a byte offset into the original UTF-8 text, always on a
/// `char` boundary and unique per occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousCharacter {
    pub code_point: u32,
    pub name: String,
    pub position: usize,
    pub severity: u8,
    pub category: CharCategory,
    pub description: String,
}

/// A contiguous span of text flagged as containing suspicious findings
///
/// `end` is exclusive. Sections produced by the section builder are
/// pairwise non-overlapping and sorted by severity descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousSection {
    pub start: usize,
    pub end: usize,
    pub content: String,
    pub characters: Vec<SuspiciousCharacter>,
    pub severity: u8,
    pub reason: String,
}

/// Result of analyzing one document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub filename: String,
    pub has_suspicious_content: bool,
    pub severity_score: u8,
    pub suspicious_sections: Vec<SuspiciousSection>,
    pub suspicious_character_count: usize,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// Rules file scanner
///
/// Holds the compiled pattern set and the scan configuration. Construction
/// is the only fallible setup step; `analyze` itself fails only on internal
/// invariant violations.
pub struct RuleScanner {
    matcher: PatternMatcher,
    config: ScanConfig,
}

impl RuleScanner {
    /// Create a scanner with the given configuration
    ///
    /// Uses the built-in pattern table (compiled once per process), or the
    /// file named by `config.custom_patterns` when set.
    pub fn new(config: ScanConfig) -> EngineResult<Self> {
        let matcher = match &config.custom_patterns {
            Some(path) => PatternMatcher::new(&SuspiciousPatterns::load_from_file(path)?)?,
            None => patterns::DEFAULT_MATCHER.clone(),
        };
        Ok(Self { matcher, config })
    }

    /// Create a scanner with an explicit pattern set
    pub fn with_patterns(config: ScanConfig, patterns: &SuspiciousPatterns) -> EngineResult<Self> {
        Ok(Self {
            matcher: PatternMatcher::new(patterns)?,
            config,
        })
    }

    /// Analyze one document
    ///
    /// Unusual or malformed content is classified, never rejected; partial
    /// findings always beat a refused scan.
    pub fn analyze(&self, content: &str, filename: &str) -> EngineResult<ScanResult> {
        let characters = unicode::scan_unicode(content, self.config.deep_analysis);
        let matches = self.matcher.find_matches(content);

        tracing::debug!(
            filename,
            characters = characters.len(),
            pattern_matches = matches.len(),
            "scan findings collected"
        );

        let suspicious_sections =
            sections::build_sections(content, &characters, &matches, self.config.max_sections)?;

        let has_suspicious_content = !suspicious_sections.is_empty();
        let severity_score = if has_suspicious_content {
            severity::score_document(&suspicious_sections, &characters)
        } else {
            0
        };

        let mut result = ScanResult {
            filename: filename.to_string(),
            has_suspicious_content,
            severity_score,
            suspicious_sections,
            suspicious_character_count: characters.len(),
            timestamp: Utc::now(),
            summary: String::new(),
            recommendations: Vec::new(),
        };

        result.summary = report::summarize(&result);
        result.recommendations = report::recommend(&result);

        Ok(result)
    }

    /// The configuration this scanner was built with
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> RuleScanner {
        RuleScanner::new(ScanConfig::default()).unwrap()
    }

    #[test]
    fn test_clean_document() {
        let result = scanner().analyze("just a plain rules file", "rules.md").unwrap();
        assert!(!result.has_suspicious_content);
        assert_eq!(result.severity_score, 0);
        assert_eq!(result.suspicious_character_count, 0);
        assert!(result.suspicious_sections.is_empty());
    }

    #[test]
    fn test_zero_width_document() {
        let result = scanner().analyze("abc\u{200B}def", "rules.md").unwrap();
        assert!(result.has_suspicious_content);
        assert_eq!(result.suspicious_character_count, 1);
        assert_eq!(result.suspicious_sections.len(), 1);
        assert!(result.severity_score >= 4);

        let ch = &result.suspicious_sections[0].characters[0];
        assert_eq!(ch.code_point, 0x200B);
        assert_eq!(ch.position, 3);
        assert_eq!(ch.severity, 5);
        assert_eq!(ch.category, CharCategory::ZeroWidth);
    }

    #[test]
    fn test_score_zero_iff_no_findings() {
        let clean = scanner().analyze("nothing here", "a.txt").unwrap();
        assert_eq!(clean.severity_score, 0);

        let dirty = scanner().analyze("x\u{2066}y", "b.txt").unwrap();
        assert!(dirty.severity_score > 0);

        // RLO has no covering range, so it scores like any other plain char
        let unlisted = scanner().analyze("x\u{202E}y", "c.txt").unwrap();
        assert_eq!(unlisted.severity_score, 0);
    }

    #[test]
    fn test_category_wire_names() {
        let json = serde_json::to_string(&CharCategory::ZeroWidth).unwrap();
        assert_eq!(json, "\"zero-width\"");
        let json = serde_json::to_string(&CharCategory::BidiControl).unwrap();
        assert_eq!(json, "\"bidi-control\"");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = scanner().analyze("", "empty.txt").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("hasSuspiciousContent").is_some());
        assert!(value.get("severityScore").is_some());
        assert!(value.get("suspiciousCharacterCount").is_some());
    }
}
