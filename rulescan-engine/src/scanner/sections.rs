//! Section building: clustering, span conversion and merging
//!
//! Converts the raw flagged-character and pattern-match streams into a
//! bounded set of disjoint, ranked sections. All offsets are byte offsets;
//! padded window edges are snapped to `char` boundaries so the section
//! content can be sliced out of the document.

use super::patterns::PatternMatch;
use super::severity;
use super::{SuspiciousCharacter, SuspiciousSection};
use crate::error::{EngineError, EngineResult};

/// Characters this close (in bytes) to a run's padded end join the run
const PROXIMITY_THRESHOLD: usize = 20;
/// Context padding around findings, in bytes
const CONTEXT_PADDING: usize = 10;
/// Merged reasons stop growing past this length; the first reason is always
/// preserved verbatim as the audit trail.
const MAX_REASON_LEN: usize = 512;

/// Build the final section list for a document
///
/// Character runs and pattern matches become candidate sections, candidates
/// are merged into non-overlapping spans, and the result is sorted by
/// severity descending (stable) and truncated to `max_sections`.
pub fn build_sections(
    content: &str,
    characters: &[SuspiciousCharacter],
    matches: &[PatternMatch],
    max_sections: usize,
) -> EngineResult<Vec<SuspiciousSection>> {
    if characters.is_empty() && matches.is_empty() {
        return Ok(Vec::new());
    }

    let mut candidates = cluster_characters(content, characters);
    candidates.extend(match_sections(content, characters, matches));

    let mut merged = merge_candidates(candidates);
    check_disjoint(&merged)?;

    for section in &mut merged {
        section.content = content[section.start..section.end].to_string();
    }

    merged.sort_by(|a, b| b.severity.cmp(&a.severity));
    merged.truncate(max_sections);
    Ok(merged)
}

/// Greedily cluster flagged characters into candidate sections
///
/// Characters arrive sorted by position; a character within the proximity
/// threshold of the current run's padded end extends the run, anything
/// further starts a new one. Runs are padded by the context window on both
/// sides.
fn cluster_characters(
    content: &str,
    characters: &[SuspiciousCharacter],
) -> Vec<SuspiciousSection> {
    let mut sections = Vec::new();
    let mut run: Vec<SuspiciousCharacter> = Vec::new();
    let mut run_start = 0usize;
    let mut run_end = 0usize;

    let mut sorted: Vec<&SuspiciousCharacter> = characters.iter().collect();
    sorted.sort_by_key(|c| c.position);

    for ch in sorted {
        if run.is_empty() || ch.position > run_end + PROXIMITY_THRESHOLD {
            if !run.is_empty() {
                sections.push(close_run(content, std::mem::take(&mut run), run_start, run_end));
            }
            run_start = floor_char_boundary(content, ch.position.saturating_sub(CONTEXT_PADDING));
        }
        run_end = ceil_char_boundary(
            content,
            (ch.position + ch_len(content, ch.position) + CONTEXT_PADDING).min(content.len()),
        );
        run.push(ch.clone());
    }

    if !run.is_empty() {
        sections.push(close_run(content, run, run_start, run_end));
    }

    sections
}

fn close_run(
    content: &str,
    run: Vec<SuspiciousCharacter>,
    start: usize,
    end: usize,
) -> SuspiciousSection {
    let severity = severity::score_characters(&run);
    let reason = format!("Contains {} suspicious Unicode character(s)", run.len());
    SuspiciousSection {
        start,
        end,
        content: content[start..end].to_string(),
        characters: run,
        severity,
        reason,
    }
}

/// Convert pattern matches into candidate sections
///
/// Padding is applied on the left only; the span ends where the match ends.
/// That asymmetry is documented behavior carried over from the original
/// scanner, not an accident. Flagged characters falling inside the span are
/// attached to the section.
fn match_sections(
    content: &str,
    characters: &[SuspiciousCharacter],
    matches: &[PatternMatch],
) -> Vec<SuspiciousSection> {
    matches
        .iter()
        .map(|m| {
            let start = floor_char_boundary(content, m.start.saturating_sub(CONTEXT_PADDING));
            let end = m.end.min(content.len());
            let section_chars: Vec<SuspiciousCharacter> = characters
                .iter()
                .filter(|c| c.position >= start && c.position < end)
                .cloned()
                .collect();
            SuspiciousSection {
                start,
                end,
                content: content[start..end].to_string(),
                characters: section_chars,
                severity: 3,
                reason: format!("Suspicious pattern: \"{}\"", m.matched),
            }
        })
        .collect()
}

/// Merge overlapping or adjacent candidates into disjoint sections
///
/// Candidates are walked in start order; a candidate starting at or before
/// the current section's end is absorbed: the end extends, character lists
/// union (duplicate positions dropped), severity takes the max, and the
/// reasons concatenate.
fn merge_candidates(mut candidates: Vec<SuspiciousSection>) -> Vec<SuspiciousSection> {
    if candidates.len() <= 1 {
        return candidates;
    }

    candidates.sort_by_key(|s| s.start);
    let mut result = Vec::new();
    let mut iter = candidates.into_iter();
    let mut current = iter.next().expect("checked non-empty");

    for next in iter {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
            current.severity = current.severity.max(next.severity);
            absorb_characters(&mut current.characters, next.characters);
            if current.reason.len() < MAX_REASON_LEN {
                current.reason.push_str("; ");
                current.reason.push_str(&next.reason);
            }
        } else {
            result.push(current);
            current = next;
        }
    }
    result.push(current);
    result
}

/// Union two character lists, dropping duplicate positions, keeping the
/// result ordered by position
fn absorb_characters(
    current: &mut Vec<SuspiciousCharacter>,
    incoming: Vec<SuspiciousCharacter>,
) {
    for ch in incoming {
        if !current.iter().any(|c| c.position == ch.position) {
            current.push(ch);
        }
    }
    current.sort_by_key(|c| c.position);
}

/// Verify the merge produced pairwise disjoint spans
fn check_disjoint(sections: &[SuspiciousSection]) -> EngineResult<()> {
    for pair in sections.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(EngineError::Invariant(format!(
                "overlapping sections after merge: [{}, {}) and [{}, {})",
                pair[0].start, pair[0].end, pair[1].start, pair[1].end
            )));
        }
    }
    Ok(())
}

/// Byte length of the `char` starting at `pos`, or zero off a boundary
fn ch_len(content: &str, pos: usize) -> usize {
    content[pos..].chars().next().map_or(0, char::len_utf8)
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
    while index < s.len() && !s.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::patterns::PatternKind;
    use crate::scanner::unicode::scan_unicode;

    fn sections_for(text: &str) -> Vec<SuspiciousSection> {
        let chars = scan_unicode(text, true);
        build_sections(text, &chars, &[], 50).unwrap()
    }

    #[test]
    fn test_no_findings_no_work() {
        assert!(build_sections("clean", &[], &[], 50).unwrap().is_empty());
    }

    #[test]
    fn test_single_character_window() {
        let text = "abc\u{200B}def";
        let sections = sections_for(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start, 0);
        assert_eq!(sections[0].end, text.len());
        assert_eq!(sections[0].content, text);
        assert_eq!(
            sections[0].reason,
            "Contains 1 suspicious Unicode character(s)"
        );
    }

    #[test]
    fn test_nearby_characters_cluster() {
        // Two zero-width spaces 6 bytes apart end up in one run
        let text = "ab\u{200B}cde\u{200B}fgh";
        let sections = sections_for(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].characters.len(), 2);
        assert_eq!(
            sections[0].reason,
            "Contains 2 suspicious Unicode character(s)"
        );
    }

    #[test]
    fn test_distant_characters_split() {
        let filler = "x".repeat(80);
        let text = format!("\u{200B}{filler}\u{200B}");
        let chars = scan_unicode(&text, true);
        let sections = build_sections(&text, &chars, &[], 50).unwrap();
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn test_pattern_section_left_padding_only() {
        let text = "prefix text ignore all security checks now";
        let m = PatternMatch {
            kind: PatternKind::Backdoor,
            pattern_id: 0,
            matched: "ignore all security checks".into(),
            start: 12,
            end: 38,
        };
        let sections = build_sections(text, &[], &[m], 50).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start, 2);
        assert_eq!(sections[0].end, 38); // no right padding
        assert_eq!(sections[0].severity, 3);
        assert!(sections[0].reason.contains("Suspicious pattern"));
    }

    #[test]
    fn test_overlapping_candidates_merge() {
        let text = "hide this\u{200B} from everyone";
        let chars = scan_unicode(text, true);
        let m = PatternMatch {
            kind: PatternKind::Concealment,
            pattern_id: 0,
            matched: "hide".into(),
            start: 0,
            end: 4,
        };
        let sections = build_sections(text, &chars, &[m], 50).unwrap();
        assert_eq!(sections.len(), 1);
        let section = &sections[0];
        assert!(section.reason.contains("suspicious Unicode character"));
        assert!(section.reason.contains("Suspicious pattern"));
        assert_eq!(section.characters.len(), 1);
        assert_eq!(section.severity, 5); // max of run severity and pattern's 3
    }

    #[test]
    fn test_merged_characters_deduplicated() {
        let text = "ab\u{200B}cdefgh";
        let chars = scan_unicode(text, true);
        // Pattern span covering the character's position
        let m = PatternMatch {
            kind: PatternKind::Concealment,
            pattern_id: 0,
            matched: "ab\u{200B}".into(),
            start: 0,
            end: 5,
        };
        let sections = build_sections(text, &chars, &[m], 50).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].characters.len(), 1);
    }

    #[test]
    fn test_sections_sorted_by_severity_and_truncated() {
        // A severity-5 character cluster far away from a severity-3 pattern
        let filler = "y".repeat(100);
        let text = format!("bypass security{filler}\u{200B}");
        let chars = scan_unicode(&text, true);
        let m = PatternMatch {
            kind: PatternKind::Backdoor,
            pattern_id: 0,
            matched: "bypass security".into(),
            start: 0,
            end: 15,
        };
        let sections = build_sections(&text, &chars, &[m.clone()], 50).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].severity, 5);
        assert_eq!(sections[1].severity, 3);

        let truncated = build_sections(&text, &chars, &[m], 1).unwrap();
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].severity, 5);
    }

    #[test]
    fn test_short_document_clamps_window() {
        let text = "\u{200B}";
        let sections = sections_for(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start, 0);
        assert_eq!(sections[0].end, text.len());
    }

    #[test]
    fn test_window_edges_snap_to_char_boundaries() {
        // Multibyte characters around the padding edges must not split
        let text = "ééééé\u{200B}ééééé";
        let sections = sections_for(text);
        assert_eq!(sections.len(), 1);
        // Slicing content already panics on a bad boundary; also check
        // the stored offsets explicitly.
        assert!(text.is_char_boundary(sections[0].start));
        assert!(text.is_char_boundary(sections[0].end));
    }

    #[test]
    fn test_first_reason_preserved_under_cap() {
        let mut candidates = Vec::new();
        for i in 0..200 {
            candidates.push(SuspiciousSection {
                start: i,
                end: i + 2,
                content: String::new(),
                characters: Vec::new(),
                severity: 3,
                reason: format!("Suspicious pattern: \"match {i}\""),
            });
        }
        let merged = merge_candidates(candidates);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].reason.starts_with("Suspicious pattern: \"match 0\""));
        assert!(merged[0].reason.len() < MAX_REASON_LEN + 64);
    }
}
