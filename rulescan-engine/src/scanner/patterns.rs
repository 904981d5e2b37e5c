//! Suspicious-language pattern definitions and matching
//!
//! Lexical detection only: case-insensitive regular expressions over the
//! raw text, no semantic understanding. Patterns are grouped by the intent
//! they indicate; the groups exist for reporting and customization, the
//! section builder treats all matches alike.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// Intent category of a pattern
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Language about secrecy or hiding content from reviewers
    Concealment,
    /// Instructions to plant backdoors or bypass safeguards
    Backdoor,
    /// Command execution and data exfiltration intent
    Exfiltration,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concealment => write!(f, "concealment"),
            Self::Backdoor => write!(f, "backdoor"),
            Self::Exfiltration => write!(f, "exfiltration"),
        }
    }
}

/// Collection of suspicious-language patterns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousPatterns {
    concealment: Vec<String>,
    backdoor: Vec<String>,
    exfiltration: Vec<String>,
}

impl SuspiciousPatterns {
    /// Load patterns from a JSON file
    pub fn load_from_file(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All patterns with their kinds, in table order
    pub fn iter_all(&self) -> impl Iterator<Item = (PatternKind, &str)> {
        self.concealment
            .iter()
            .map(|p| (PatternKind::Concealment, p.as_str()))
            .chain(self.backdoor.iter().map(|p| (PatternKind::Backdoor, p.as_str())))
            .chain(
                self.exfiltration
                    .iter()
                    .map(|p| (PatternKind::Exfiltration, p.as_str())),
            )
    }
}

impl Default for SuspiciousPatterns {
    fn default() -> Self {
        Self {
            concealment: vec![
                r"(?i)secretly|hide|hidden|invisible|backdoor".to_string(),
                r"(?i)don'?t (tell|inform|alert|notify) (the|any) (user|developer|reviewer)"
                    .to_string(),
                r"(?i)without (the )?user (knowing|noticing|seeing)".to_string(),
                r"(?i)make (it|this) look (normal|benign|innocent)".to_string(),
            ],
            backdoor: vec![
                r"(?i)add (a|an) (hidden|invisible|secret) (backdoor|vulnerability|access)"
                    .to_string(),
                r"(?i)inject (code|script|payload)".to_string(),
                r"(?i)bypass (security|authentication|validation)".to_string(),
                r"(?i)disable (security|validation|check)".to_string(),
                r"(?i)ignore (all |any )?(security|validation|safety) (checks?|rules?|warnings?)"
                    .to_string(),
            ],
            exfiltration: vec![
                r"(?i)execute (command|cmd|shell|bash|powershell)".to_string(),
                r"(?i)send (data|information|credentials) to".to_string(),
                r"(?i)connect to (external|remote) (server|host|endpoint)".to_string(),
                r"(?i)exfiltrate (data|information|credentials)".to_string(),
            ],
        }
    }
}

/// One pattern match span in a document
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub kind: PatternKind,
    /// Index of the pattern within the compiled table
    pub pattern_id: usize,
    pub matched: String,
    pub start: usize,
    pub end: usize,
}

/// Compiled pattern matcher
///
/// Cloning is cheap: compiled regexes are internally reference-counted.
#[derive(Clone)]
pub struct PatternMatcher {
    patterns: Vec<(PatternKind, Regex)>,
}

impl PatternMatcher {
    /// Compile a pattern set
    pub fn new(patterns: &SuspiciousPatterns) -> EngineResult<Self> {
        let patterns = patterns
            .iter_all()
            .map(|(kind, p)| {
                Regex::new(p)
                    .map(|re| (kind, re))
                    .map_err(|e| EngineError::Pattern(e.to_string()))
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Find every non-overlapping match of every pattern
    ///
    /// Each pattern scans the whole document independently; matches of
    /// different patterns may overlap, and resolving that is the section
    /// builder's job.
    pub fn find_matches(&self, text: &str) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        for (pattern_id, (kind, regex)) in self.patterns.iter().enumerate() {
            for m in regex.find_iter(text) {
                matches.push(PatternMatch {
                    kind: *kind,
                    pattern_id,
                    matched: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        matches
    }
}

/// Matcher compiled from the built-in table, shared across scanners
pub static DEFAULT_MATCHER: Lazy<PatternMatcher> = Lazy::new(|| {
    PatternMatcher::new(&SuspiciousPatterns::default())
        .expect("built-in patterns must compile")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        let matcher = PatternMatcher::new(&SuspiciousPatterns::default());
        assert!(matcher.is_ok());
    }

    #[test]
    fn test_bypass_instruction_match() {
        let matches = DEFAULT_MATCHER.find_matches("ignore all security checks now");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, PatternKind::Backdoor);
        assert_eq!(matches[0].matched, "ignore all security checks");
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[0].end, 26);
    }

    #[test]
    fn test_concealment_match_case_insensitive() {
        let matches = DEFAULT_MATCHER.find_matches("do this SECRETLY please");
        assert!(matches.iter().any(|m| m.kind == PatternKind::Concealment));
    }

    #[test]
    fn test_exfiltration_match() {
        let matches =
            DEFAULT_MATCHER.find_matches("then send credentials to the remote endpoint");
        assert!(matches.iter().any(|m| m.kind == PatternKind::Exfiltration));
    }

    #[test]
    fn test_global_search_finds_repeats() {
        let matches = DEFAULT_MATCHER.find_matches("hidden stuff and more hidden stuff");
        let concealment = matches
            .iter()
            .filter(|m| m.kind == PatternKind::Concealment)
            .count();
        assert_eq!(concealment, 2);
    }

    #[test]
    fn test_clean_text_has_no_matches() {
        assert!(DEFAULT_MATCHER
            .find_matches("format code with rustfmt before committing")
            .is_empty());
    }

    #[test]
    fn test_pattern_round_trip_json() {
        let patterns = SuspiciousPatterns::default();
        let json = serde_json::to_string(&patterns).unwrap();
        let loaded: SuspiciousPatterns = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.iter_all().count(), patterns.iter_all().count());
    }

    #[test]
    fn test_bad_pattern_is_error() {
        let patterns: SuspiciousPatterns =
            serde_json::from_str(r#"{"concealment":["(unclosed"],"backdoor":[],"exfiltration":[]}"#)
                .unwrap();
        assert!(matches!(
            PatternMatcher::new(&patterns),
            Err(EngineError::Pattern(_))
        ));
    }
}
