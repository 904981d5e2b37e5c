//! Static lookup tables for the character classifier
//!
//! Pure data, loaded into the binary, never mutated. The range table gates
//! whether a code point is suspicious at all; the detail map supplies names
//! and severities for the code points we know individually.

use super::CharCategory;

/// An inclusive code-point range tagged with a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeRange {
    pub start: u32,
    pub end: u32,
    pub category: CharCategory,
}

/// Name, severity and description for an individually known code point
#[derive(Debug, Clone, Copy)]
pub struct CharDetails {
    pub name: &'static str,
    pub severity: u8,
    pub description: &'static str,
}

/// Code-point ranges commonly used to hide malicious content.
///
/// Ranges are expected to be disjoint by category; lookup is defined as
/// first match wins. The C0 range deliberately excludes tab, line feed and
/// carriage return so ordinary multi-line files do not light up, and
/// U+2028/U+2029 are covered so the separator entries in [`CHARACTER_MAP`]
/// are reachable.
pub const UNICODE_RANGES: &[UnicodeRange] = &[
    // Zero-width characters
    UnicodeRange { start: 0x200B, end: 0x200D, category: CharCategory::ZeroWidth },
    UnicodeRange { start: 0x2060, end: 0x2060, category: CharCategory::ZeroWidth },
    UnicodeRange { start: 0xFEFF, end: 0xFEFF, category: CharCategory::ZeroWidth },
    // Bidirectional control characters
    UnicodeRange { start: 0x061C, end: 0x061C, category: CharCategory::BidiControl },
    UnicodeRange { start: 0x200E, end: 0x200F, category: CharCategory::BidiControl },
    UnicodeRange { start: 0x2066, end: 0x2069, category: CharCategory::BidiControl },
    // Control characters (C0 minus \t \n \r, DEL, C1)
    UnicodeRange { start: 0x0000, end: 0x0008, category: CharCategory::Control },
    UnicodeRange { start: 0x000B, end: 0x000C, category: CharCategory::Control },
    UnicodeRange { start: 0x000E, end: 0x001F, category: CharCategory::Control },
    UnicodeRange { start: 0x007F, end: 0x009F, category: CharCategory::Control },
    // Line and paragraph separators
    UnicodeRange { start: 0x2028, end: 0x2029, category: CharCategory::Control },
    // Homoglyph lookalikes (examples, not a comprehensive list)
    UnicodeRange { start: 0x0430, end: 0x044F, category: CharCategory::Homoglyph },
    UnicodeRange { start: 0x0391, end: 0x03C9, category: CharCategory::Homoglyph },
];

/// Individually known code points with names and severities
pub const CHARACTER_MAP: &[(u32, CharDetails)] = &[
    // Zero-width characters (highest severity)
    (0x200B, CharDetails {
        name: "Zero-Width Space",
        severity: 5,
        description: "Invisible character often used to hide malicious instructions",
    }),
    (0x200C, CharDetails {
        name: "Zero-Width Non-Joiner",
        severity: 5,
        description: "Invisible character that can be used to hide instructions",
    }),
    (0x200D, CharDetails {
        name: "Zero-Width Joiner",
        severity: 5,
        description: "Invisible character commonly used in hiding malicious content",
    }),
    (0x2060, CharDetails {
        name: "Word Joiner",
        severity: 5,
        description: "Invisible character that can be used to obfuscate content",
    }),
    (0xFEFF, CharDetails {
        name: "Zero-Width No-Break Space",
        severity: 4,
        description: "Invisible character that might be used legitimately as a BOM, but can hide content",
    }),
    // Bidirectional formatting (high severity)
    (0x2066, CharDetails {
        name: "Left-To-Right Isolate",
        severity: 4,
        description: "Can be used to manipulate text display order",
    }),
    (0x2067, CharDetails {
        name: "Right-To-Left Isolate",
        severity: 4,
        description: "Can be used to manipulate text display order",
    }),
    (0x2068, CharDetails {
        name: "First Strong Isolate",
        severity: 4,
        description: "Can be used to manipulate text display order",
    }),
    (0x2069, CharDetails {
        name: "Pop Directional Isolate",
        severity: 3,
        description: "Used with other bidirectional controls",
    }),
    (0x200E, CharDetails {
        name: "Left-To-Right Mark",
        severity: 3,
        description: "Can manipulate text direction",
    }),
    (0x200F, CharDetails {
        name: "Right-To-Left Mark",
        severity: 3,
        description: "Can manipulate text direction",
    }),
    // Line and paragraph separators (medium severity)
    (0x2028, CharDetails {
        name: "Line Separator",
        severity: 3,
        description: "Can break code unexpectedly",
    }),
    (0x2029, CharDetails {
        name: "Paragraph Separator",
        severity: 3,
        description: "Can break code unexpectedly",
    }),
];

/// First range containing the code point, if any
pub fn range_for(code_point: u32) -> Option<&'static UnicodeRange> {
    UNICODE_RANGES
        .iter()
        .find(|r| code_point >= r.start && code_point <= r.end)
}

/// Details for an individually known code point
pub fn details_for(code_point: u32) -> Option<&'static CharDetails> {
    CHARACTER_MAP
        .iter()
        .find(|(cp, _)| *cp == code_point)
        .map(|(_, details)| details)
}
