//! Remediation utilities
//!
//! Sanitizing removes flagged characters; visualizing replaces invisible
//! characters with printable markers. Both are independent of the detection
//! pipeline and share only the flagged-character list.

use std::collections::BTreeSet;

use super::SuspiciousCharacter;

/// Remove every flagged character from the text
///
/// All target positions are taken from the original text up front, then the
/// output is rebuilt in a single forward pass that skips them. No in-place
/// splicing, so no index-shifting pitfalls.
pub fn sanitize(text: &str, characters: &[SuspiciousCharacter]) -> String {
    if characters.is_empty() {
        return text.to_string();
    }

    let excluded: BTreeSet<usize> = characters.iter().map(|c| c.position).collect();

    let mut result = String::with_capacity(text.len());
    for (position, ch) in text.char_indices() {
        if !excluded.contains(&position) {
            result.push(ch);
        }
    }
    result
}

/// Replace invisible characters with visible markers
///
/// Zero-width characters render as `[U+XXXX]`, control characters as
/// `[CTRL-XX]`; everything else passes through unchanged. Useful for
/// showing a reviewer what is actually in a flagged section.
pub fn visualize_invisible(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        let code_point = ch as u32;
        if (0x200B..=0x200D).contains(&code_point)
            || code_point == 0x2060
            || code_point == 0xFEFF
        {
            result.push_str(&format!("[U+{code_point:04X}]"));
        } else if code_point < 0x20 || (0x7F..=0x9F).contains(&code_point) {
            result.push_str(&format!("[CTRL-{code_point:02X}]"));
        } else {
            result.push(ch);
        }
    }

    result
}
