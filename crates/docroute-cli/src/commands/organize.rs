//! Organize command - analyze, route and file a single document.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use tracing::info;

use docroute_core::{FileTextSource, Organizer};

/// Arguments for the organize command.
#[derive(Args)]
pub struct OrganizeArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Destination root (overrides routing.base_path)
    #[arg(short, long)]
    base_path: Option<PathBuf>,

    /// Show what would be copied without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Processing date used when the document has no date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(args: OrganizeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    super::override_base_path(&mut config, args.base_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!(
        "Organizing {} into {}",
        args.input.display(),
        config.routing.base_path.display()
    );

    let organizer = Organizer::new(&config, args.dry_run);
    let outcome = organizer.organize(
        &FileTextSource::new(),
        &args.input,
        super::processing_time(args.date),
    );

    if !outcome.text_extracted {
        eprintln!(
            "{} No text extracted from {}",
            style("⚠").yellow(),
            args.input.display()
        );
    }

    let verb = if args.dry_run { "Would copy to" } else { "Copied to" };
    for path in &outcome.placed {
        println!("{} {} {}", style("✓").green(), verb, path.display());
    }

    if let Some(error) = outcome.error {
        anyhow::bail!("Filing failed: {}", error);
    }

    if outcome.placed.is_empty() {
        println!(
            "{} No rule matched; {} was left in place.",
            style("ℹ").blue(),
            args.input.display()
        );
    }

    Ok(())
}
