//! Report generation
//!
//! Pure functions over a finished scan: no new detection happens here, only
//! the natural-language summary and the prioritized recommendation list.

use super::ScanResult;

/// Descriptive label for a severity score
pub fn severity_label(score: u8) -> &'static str {
    match score {
        0 => "Safe",
        1 => "Low Risk",
        2 => "Moderate Risk",
        3 => "Concerning",
        4 => "High Risk",
        5 => "Critical Risk",
        _ => "Unknown",
    }
}

/// One-sentence summary of the scan
pub fn summarize(result: &ScanResult) -> String {
    if !result.has_suspicious_content {
        return "No suspicious content detected in this file.".to_string();
    }

    format!(
        "Detected {} suspicious Unicode characters and {} suspicious sections. \
         Overall severity: {}/5 ({}).",
        result.suspicious_character_count,
        result.suspicious_sections.len(),
        result.severity_score,
        severity_label(result.severity_score)
    )
}

/// Prioritized recommendations for the scan
pub fn recommend(result: &ScanResult) -> Vec<String> {
    if !result.has_suspicious_content {
        return vec!["No action needed. File appears safe.".to_string()];
    }

    let mut recommendations = Vec::new();

    if result.severity_score >= 4 {
        recommendations.push(
            "CRITICAL: This file likely contains malicious hidden content. \
             Do not use in production!"
                .to_string(),
        );
        recommendations.push("Immediately isolate this file and review its source.".to_string());
    } else if result.severity_score >= 3 {
        recommendations.push(
            "WARNING: This file contains highly suspicious elements that may be malicious."
                .to_string(),
        );
        recommendations
            .push("Thoroughly review all flagged sections before using this file.".to_string());
    } else {
        recommendations.push(
            "CAUTION: This file contains some suspicious elements that should be reviewed."
                .to_string(),
        );
    }

    if result.suspicious_character_count > 0 {
        recommendations.push(
            "Remove all invisible Unicode characters and review the sanitized content."
                .to_string(),
        );
    }

    if result
        .suspicious_sections
        .iter()
        .any(|s| s.reason.contains("pattern"))
    {
        recommendations.push(
            "Review all flagged language patterns for potential backdoor instructions."
                .to_string(),
        );
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::SuspiciousSection;
    use chrono::Utc;

    fn result(score: u8, char_count: usize, reasons: &[&str]) -> ScanResult {
        let sections = reasons
            .iter()
            .map(|r| SuspiciousSection {
                start: 0,
                end: 1,
                content: String::new(),
                characters: Vec::new(),
                severity: score.max(1),
                reason: (*r).to_string(),
            })
            .collect::<Vec<_>>();
        ScanResult {
            filename: "test.md".into(),
            has_suspicious_content: !sections.is_empty(),
            severity_score: score,
            suspicious_sections: sections,
            suspicious_character_count: char_count,
            timestamp: Utc::now(),
            summary: String::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(severity_label(0), "Safe");
        assert_eq!(severity_label(1), "Low Risk");
        assert_eq!(severity_label(3), "Concerning");
        assert_eq!(severity_label(5), "Critical Risk");
        assert_eq!(severity_label(9), "Unknown");
    }

    #[test]
    fn test_clean_summary_is_fixed_sentence() {
        let r = result(0, 0, &[]);
        assert_eq!(summarize(&r), "No suspicious content detected in this file.");
        assert_eq!(recommend(&r), vec!["No action needed. File appears safe."]);
    }

    #[test]
    fn test_summary_mentions_counts_and_label() {
        let r = result(4, 7, &["Contains 7 suspicious Unicode character(s)"]);
        let summary = summarize(&r);
        assert!(summary.contains("7 suspicious Unicode characters"));
        assert!(summary.contains("1 suspicious sections"));
        assert!(summary.contains("4/5 (High Risk)"));
    }

    #[test]
    fn test_critical_recommendations() {
        let r = result(5, 3, &["Contains 3 suspicious Unicode character(s)"]);
        let recs = recommend(&r);
        assert!(recs[0].starts_with("CRITICAL"));
        assert!(recs.iter().any(|r| r.contains("isolate")));
        assert!(recs.iter().any(|r| r.contains("invisible Unicode characters")));
        // No pattern section, so no pattern advice
        assert!(!recs.iter().any(|r| r.contains("language patterns")));
    }

    #[test]
    fn test_warning_recommendations() {
        let r = result(3, 0, &["Suspicious pattern: \"bypass security\""]);
        let recs = recommend(&r);
        assert!(recs[0].starts_with("WARNING"));
        assert!(recs.iter().any(|r| r.contains("language patterns")));
        assert!(!recs.iter().any(|r| r.contains("invisible Unicode")));
    }

    #[test]
    fn test_caution_recommendations() {
        let r = result(2, 1, &["Contains 1 suspicious Unicode character(s)"]);
        let recs = recommend(&r);
        assert!(recs[0].starts_with("CAUTION"));
    }
}
