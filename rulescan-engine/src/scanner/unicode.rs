//! Unicode anomaly detection
//!
//! The classifier decides whether a single code point is suspicious; the
//! scanner walks a document's grapheme clusters and applies the classifier
//! to every underlying code point. Cluster-aware walking matters because a
//! zero-width character can be combined with a visible character into one
//! grapheme cluster and must still be reported at its own byte offset, not
//! the cluster's.

use unicode_security::MixedScript;
use unicode_segmentation::UnicodeSegmentation;

use super::tables;
use super::{CharCategory, SuspiciousCharacter};

/// Classification of one code point
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: CharCategory,
    pub severity: u8,
    pub name: String,
    pub description: String,
}

/// Classify a single code point against the suspicious tables
///
/// ASCII printable characters are never suspicious. For a code point inside
/// a suspicious range without an individual map entry, a default entry is
/// synthesized: severity 5 for zero-width, 3 otherwise.
pub fn classify(code_point: u32) -> Option<Classification> {
    // Fast path for the overwhelmingly common case
    if (0x20..=0x7E).contains(&code_point) {
        return None;
    }

    let range = tables::range_for(code_point)?;

    Some(match tables::details_for(code_point) {
        Some(details) => Classification {
            category: range.category,
            severity: details.severity,
            name: details.name.to_string(),
            description: details.description.to_string(),
        },
        None => Classification {
            category: range.category,
            severity: if range.category == CharCategory::ZeroWidth { 5 } else { 3 },
            name: format!("Unknown Character (U+{code_point:04X})"),
            description: format!("Suspicious character in the {} category", range.category),
        },
    })
}

/// Scan a document for suspicious characters
///
/// Returns one entry per flagged code point, ordered by position ascending,
/// positions unique. Homoglyph findings are reported only under deep
/// analysis and only when the document actually mixes scripts; a document
/// written entirely in Cyrillic is not an attack.
pub fn scan_unicode(text: &str, deep_analysis: bool) -> Vec<SuspiciousCharacter> {
    let mut result = Vec::new();
    let flag_homoglyphs = deep_analysis && !text.is_empty() && !text.is_single_script();

    for (cluster_start, cluster) in text.grapheme_indices(true) {
        for (offset, ch) in cluster.char_indices() {
            let code_point = ch as u32;
            let Some(classification) = classify(code_point) else {
                continue;
            };
            if classification.category == CharCategory::Homoglyph && !flag_homoglyphs {
                continue;
            }

            result.push(SuspiciousCharacter {
                code_point,
                name: classification.name,
                position: cluster_start + offset,
                severity: classification.severity,
                category: classification.category,
                description: classification.description,
            });
        }
    }

    result
}
