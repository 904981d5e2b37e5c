//! Centralized error handling for the rulescan engine
//!
//! The engine is pure computation over in-memory text, so the taxonomy is
//! narrow: pattern compilation, configuration loading, and internal
//! invariant violations. Malformed or unusual input text is never an error;
//! it is the very thing being scanned for.

use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// A suspicious-language pattern failed to compile
    #[error("pattern compilation failed: {0}")]
    Pattern(String),

    /// Configuration could not be loaded or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// An internal invariant was violated. Surfaced rather than swallowed:
    /// silently truncating a scan range creates false negatives.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// IO errors (custom pattern or config files)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors (custom pattern files)
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::Pattern("unclosed group".into());
        assert_eq!(err.to_string(), "pattern compilation failed: unclosed group");

        let err = EngineError::Invariant("overlapping sections".into());
        assert!(err.to_string().contains("invariant"));
    }
}
