//! Severity scoring
//!
//! Two tiers: a character-set score used for individual runs, and a
//! document score that folds in section count. Many scattered low-severity
//! sections can push the document score up on their own; hiding one payload
//! in fifty places is not less suspicious than hiding it in one.

use super::{SuspiciousCharacter, SuspiciousSection};

/// Score a set of flagged characters, 0-5
///
/// Zero iff the set is empty. Otherwise the severity average is weighted by
/// a quantity factor (1.5 above 10 characters, 2.0 above 50) and clamped at
/// 5. A non-empty set never scores below 1 since individual severities are
/// at least 1.
pub fn score_characters(characters: &[SuspiciousCharacter]) -> u8 {
    if characters.is_empty() {
        return 0;
    }

    let total: u32 = characters.iter().map(|c| u32::from(c.severity)).sum();
    let average = f64::from(total) / characters.len() as f64;

    let quantity_factor = if characters.len() > 50 {
        2.0
    } else if characters.len() > 10 {
        1.5
    } else {
        1.0
    };

    ((average * quantity_factor).round() as u8).min(5)
}

/// Score a whole document, 0-5
///
/// Weighted blend of the strongest section and the character score
/// (0.7/0.3), scaled by a section-count factor (1.2 above 3 sections, 1.5
/// above 10), rounded and clamped at 5.
pub fn score_document(
    sections: &[SuspiciousSection],
    characters: &[SuspiciousCharacter],
) -> u8 {
    if sections.is_empty() {
        return 0;
    }

    let max_section_severity = sections.iter().map(|s| s.severity).max().unwrap_or(0);
    let character_severity = score_characters(characters);

    let section_factor = if sections.len() > 10 {
        1.5
    } else if sections.len() > 3 {
        1.2
    } else {
        1.0
    };

    let weighted = (f64::from(max_section_severity) * 0.7
        + f64::from(character_severity) * 0.3)
        * section_factor;
    (weighted.round() as u8).min(5)
}
