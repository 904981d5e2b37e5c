//! `rulescan` detection engine
//!
//! Inspects the text of AI assistant rules files (Cursor rules, agent
//! configuration, prompt fragments) for content that could steer code
//! generation without a human reviewer noticing: invisible Unicode
//! characters, bidirectional overrides, homoglyph substitution, and
//! suspicious instruction language.
//!
//! The engine is pure computation over in-memory text. It performs no I/O,
//! holds no state between calls beyond its static lookup tables, and is safe
//! to drive from one thread per document. Hosts (CLI, upload handlers) own
//! file reading, size ceilings, and result presentation.

pub mod config;
pub mod error;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{EngineError, EngineResult};
pub use scanner::patterns::SuspiciousPatterns;
pub use scanner::sanitize::{sanitize, visualize_invisible};
pub use scanner::{CharCategory, RuleScanner, ScanResult, SuspiciousCharacter, SuspiciousSection};
