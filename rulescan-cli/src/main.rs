//! rulescan CLI for inspecting AI assistant rules files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use rulescan_engine::scanner::unicode::scan_unicode;
use rulescan_engine::{sanitize, RuleScanner, ScanConfig, ScanResult};

mod output;
use output::{print_scan_results, OutputFormat};

/// rulescan - detect hidden and obfuscated content in AI rules files
#[derive(Parser, Debug)]
#[command(name = "rulescan")]
#[command(about = "Scanner for hidden Unicode and suspicious instructions in AI rules files", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan files or directories for suspicious content
    Scan {
        /// Path to scan (file or directory)
        path: String,

        /// Output format (json, table, brief)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Recursively scan directories
        #[arg(short, long)]
        recursive: bool,

        /// File extensions to include (e.g. json,md,cursor)
        #[arg(short, long)]
        extensions: Option<String>,

        /// Maximum file size in MB
        #[arg(long, default_value = "10")]
        max_size_mb: u64,

        /// Minimum section severity (1-5) to report
        #[arg(long, default_value = "1")]
        min_severity: u8,

        /// Skip deep analysis (homoglyph detection)
        #[arg(long)]
        no_deep: bool,
    },

    /// Write a sanitized copy of a file with flagged characters removed
    Sanitize {
        /// File to sanitize
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("rulescan={log_level}"))
        .init();

    match cli.command {
        Commands::Scan {
            path,
            format,
            recursive,
            extensions,
            max_size_mb,
            min_severity,
            no_deep,
        } => scan_command(
            path,
            format,
            recursive,
            extensions,
            max_size_mb,
            min_severity,
            no_deep,
        ),
        Commands::Sanitize { path, output } => sanitize_command(&path, output.as_deref()),
    }
}

#[allow(clippy::too_many_arguments)]
fn scan_command(
    path: String,
    format: String,
    recursive: bool,
    extensions: Option<String>,
    max_size_mb: u64,
    min_severity: u8,
    no_deep: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let path = Path::new(&path);

    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let output_format = OutputFormat::from_str(&format)?;

    let mut config = ScanConfig::load().context("Failed to load configuration")?;
    config.max_file_size = max_size_mb * 1024 * 1024;
    config.min_severity = min_severity;
    if no_deep {
        config.deep_analysis = false;
    }
    if let Some(ext) = extensions {
        config.include_extensions = ext
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .collect();
    }

    let scanner = RuleScanner::new(config).context("Failed to create scanner")?;

    let files_to_scan = collect_files(path, recursive, scanner.config())?;
    if files_to_scan.is_empty() {
        println!("{}", "No files found to scan".yellow());
        return Ok(());
    }

    let progress = if output_format != OutputFormat::Json && files_to_scan.len() > 1 {
        let pb = ProgressBar::new(files_to_scan.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("static template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut results = Vec::new();
    for file_path in &files_to_scan {
        if let Some(pb) = &progress {
            pb.set_message(format!(
                "Scanning {}",
                file_path.file_name().unwrap_or_default().to_string_lossy()
            ));
        }

        match scan_file(&scanner, file_path) {
            Ok(result) => results.push((file_path.clone(), result)),
            Err(e) => tracing::warn!("Failed to scan {}: {e}", file_path.display()),
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_scan_results(&results, files_to_scan.len(), start_time.elapsed(), output_format);

    Ok(())
}

/// Scan one file, applying the minimum-severity filter to the sections
fn scan_file(scanner: &RuleScanner, path: &Path) -> Result<ScanResult> {
    // Lossy read: malformed encodings are exactly what we scan for, so a
    // file that is not clean UTF-8 still gets analyzed.
    let bytes = std::fs::read(path).context("Failed to read file")?;
    let content = String::from_utf8_lossy(&bytes);

    let mut result = scanner
        .analyze(&content, &path.to_string_lossy())
        .context("Failed to analyze file content")?;

    let min_severity = scanner.config().min_severity;
    if min_severity > 1 {
        result
            .suspicious_sections
            .retain(|s| s.severity >= min_severity);
    }
    Ok(result)
}

fn collect_files(path: &Path, recursive: bool, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        let metadata = path.metadata()?;
        if metadata.len() <= config.max_file_size {
            files.push(path.to_path_buf());
        } else {
            tracing::warn!(
                "Skipping large file: {} ({} MB)",
                path.display(),
                metadata.len() / 1024 / 1024
            );
        }
        return Ok(files);
    }

    let walker = if recursive {
        WalkDir::new(path)
    } else {
        WalkDir::new(path).max_depth(1)
    };

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension() else {
            continue;
        };
        let ext = ext.to_string_lossy().to_lowercase();
        if !config.include_extensions.iter().any(|e| *e == ext) {
            continue;
        }

        let metadata = entry.metadata()?;
        if metadata.len() <= config.max_file_size {
            files.push(path.to_path_buf());
        } else {
            tracing::debug!(
                "Skipping large file: {} ({} MB)",
                path.display(),
                metadata.len() / 1024 / 1024
            );
        }
    }

    Ok(files)
}

fn sanitize_command(path: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = std::fs::read(path).context("Failed to read file")?;
    let content = String::from_utf8_lossy(&bytes);

    let flagged = scan_unicode(&content, true);
    let clean = sanitize(&content, &flagged);

    match output {
        Some(out) => {
            std::fs::write(out, &clean).context("Failed to write sanitized file")?;
            println!(
                "Removed {} suspicious character(s), wrote {}",
                flagged.len(),
                out.display()
            );
        }
        None => print!("{clean}"),
    }

    Ok(())
}
