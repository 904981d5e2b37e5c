//! Output formatting for scan results

use colored::Colorize;
use comfy_table::{presets, ContentArrangement, Table};
use rulescan_engine::{visualize_invisible, ScanResult};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Brief,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "brief" => Ok(Self::Brief),
            _ => anyhow::bail!(
                "Invalid output format: {}. Valid options: table, json, brief",
                s
            ),
        }
    }
}

pub fn print_scan_results(
    results: &[(PathBuf, ScanResult)],
    total_files: usize,
    duration: Duration,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Table => print_table_results(results, total_files, duration),
        OutputFormat::Json => print_json_results(results, total_files, duration),
        OutputFormat::Brief => print_brief_results(results, total_files, duration),
    }
}

fn severity_color(severity: u8) -> &'static str {
    match severity {
        5 => "red",
        4 => "yellow",
        3 => "blue",
        _ => "white",
    }
}

fn print_table_results(results: &[(PathBuf, ScanResult)], total_files: usize, duration: Duration) {
    println!("\n{}", "=== Scan Results ===".bold().cyan());

    let flagged: Vec<_> = results
        .iter()
        .filter(|(_, r)| r.has_suspicious_content)
        .collect();

    if flagged.is_empty() {
        println!("\n{}", "✓ No suspicious content detected!".green().bold());
    } else {
        for (path, result) in &flagged {
            println!(
                "\n{}: severity {}",
                path.display().to_string().yellow(),
                format!("{}/5", result.severity_score)
                    .color(severity_color(result.severity_score))
                    .bold()
            );
            println!("{}", result.summary);

            let mut table = Table::new();
            table
                .load_preset(presets::UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Span", "Severity", "Reason", "Content"]);

            for section in &result.suspicious_sections {
                table.add_row(vec![
                    format!("{}..{}", section.start, section.end),
                    section
                        .severity
                        .to_string()
                        .color(severity_color(section.severity))
                        .to_string(),
                    section.reason.clone(),
                    truncate(&visualize_invisible(&section.content), 60),
                ]);
            }
            println!("{table}");

            if !result.recommendations.is_empty() {
                println!("{}", "Recommendations:".bold());
                for (i, recommendation) in result.recommendations.iter().enumerate() {
                    println!("  {}. {recommendation}", i + 1);
                }
            }
        }
    }

    println!("\n{}", "=== Summary ===".bold().cyan());
    println!("Files scanned: {}", total_files.to_string().bright_blue());
    println!(
        "Files flagged: {}",
        if flagged.is_empty() {
            "0".green().to_string()
        } else {
            flagged.len().to_string().red().to_string()
        }
    );
    println!("Scan duration: {:.2}s", duration.as_secs_f64());
}

fn print_json_results(results: &[(PathBuf, ScanResult)], total_files: usize, duration: Duration) {
    // ScanResult passes through unchanged; hosts rely on its wire shape.
    let json_output = serde_json::json!({
        "summary": {
            "files_scanned": total_files,
            "files_flagged": results.iter().filter(|(_, r)| r.has_suspicious_content).count(),
            "duration_ms": duration.as_millis(),
        },
        "results": results.iter().map(|(_, result)| result).collect::<Vec<_>>(),
    });

    match serde_json::to_string_pretty(&json_output) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!("Failed to serialize results: {e}"),
    }
}

fn print_brief_results(results: &[(PathBuf, ScanResult)], total_files: usize, duration: Duration) {
    let flagged: Vec<_> = results
        .iter()
        .filter(|(_, r)| r.has_suspicious_content)
        .collect();

    if flagged.is_empty() {
        println!("{}", "✓ Clean".green().bold());
    } else {
        println!("{}", "✗ Suspicious content detected".red().bold());
        for (path, result) in &flagged {
            println!(
                "{}: severity {}/5, {} section(s), {} character(s)",
                path.display(),
                result.severity_score,
                result.suspicious_sections.len(),
                result.suspicious_character_count,
            );
        }
    }

    println!(
        "\nScanned {} files in {:.2}s | {} flagged",
        total_files,
        duration.as_secs_f64(),
        flagged.len()
    );
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}
