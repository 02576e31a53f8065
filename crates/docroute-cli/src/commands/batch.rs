//! Batch command - organize every file matching a glob pattern.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use docroute_core::{DocumentOutcome, FileTextSource, Organizer, RunStats};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (e.g. "inbox/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Destination root (overrides routing.base_path)
    #[arg(short, long)]
    base_path: Option<PathBuf>,

    /// Show what would be copied without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Write a per-file summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Processing date used when a document has no date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    super::override_base_path(&mut config, args.base_path.clone())?;

    let supported = FileTextSource::supported_extensions();
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            let ext = p
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            supported.contains(&ext.as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let organizer = Organizer::new(&config, args.dry_run);
    let source = FileTextSource::new();
    let mut clock = super::ProcessingClock::new(args.date);

    let mut stats = RunStats::new();
    let mut outcomes = Vec::with_capacity(files.len());

    for path in &files {
        let outcome = organizer.organize(&source, path, clock.tick());
        if let Some(error) = &outcome.error {
            warn!("Failed to organize {}: {}", path.display(), error);
        }
        stats.record(&outcome);
        outcomes.push(outcome);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_stats(&stats, args.dry_run);

    let failed: Vec<&DocumentOutcome> = outcomes.iter().filter(|o| o.is_failed()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in failed {
            println!(
                "  - {}: {}",
                outcome.file.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    debug!("Batch finished in {:?}", start.elapsed());

    Ok(())
}

fn print_stats(stats: &RunStats, dry_run: bool) {
    println!();
    println!(
        "{} Processed {} files{}",
        style("✓").green(),
        stats.total,
        if dry_run { " (dry run)" } else { "" }
    );
    println!(
        "   {} filed, {} unrouted, {} failed, {} without text",
        style(stats.filed).green(),
        style(stats.unrouted).yellow(),
        style(stats.failed).red(),
        stats.no_text
    );
    println!("   Success rate: {:.1}%", stats.success_rate());

    if !stats.by_type.is_empty() {
        println!("   By type:");
        for (doc_type, count) in &stats.by_type {
            println!("     {:<14} {}", doc_type, count);
        }
    }
}

fn write_summary(path: &Path, outcomes: &[DocumentOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "text_extracted",
        "copies",
        "destinations",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let status = if outcome.is_failed() {
            "error"
        } else if outcome.is_filed() {
            "filed"
        } else {
            "unrouted"
        };

        let destinations: Vec<String> = outcome
            .placed
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        wtr.write_record([
            filename,
            status,
            outcome.document_type.map(|t| t.key()).unwrap_or(""),
            if outcome.text_extracted { "yes" } else { "no" },
            &outcome.placed.len().to_string(),
            &destinations.join(";"),
            outcome.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
