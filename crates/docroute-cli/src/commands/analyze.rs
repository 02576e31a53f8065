//! Analyze command - extract the attribute bundle of a single file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docroute_core::extract::DocumentReport;
use docroute_core::{load_document, DocumentExtractor, FileTextSource};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON report
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: AnalyzeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Analyzing file: {}", args.input.display());

    let document = load_document(&FileTextSource::new(), &args.input)?;
    let result = DocumentExtractor::from_config(&config.extraction).analyze(&document);
    let report = DocumentReport::new(args.input.display().to_string(), &document, &result);

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => format_text(&report),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_text(report: &DocumentReport) -> String {
    let bundle = &report.bundle;
    let mut output = String::new();

    output.push_str(&format!("File: {} ({:.1} KB)\n", report.file_name, report.size_kb));

    if let Some(error) = &report.error {
        output.push_str(&format!("Error: {}\n", error));
        return output;
    }

    match bundle.document_type {
        Some(t) => output.push_str(&format!("Type: {}\n", t.label())),
        None => output.push_str("Type: -\n"),
    }
    if let Some(bank) = &bundle.bank {
        output.push_str(&format!("Bank: {}\n", bank.display_name()));
    }

    for id in &bundle.person_ids {
        output.push_str(&format!("CPF:  {}\n", id));
    }
    for id in &bundle.organization_ids {
        output.push_str(&format!("CNPJ: {}\n", id));
    }

    if !bundle.dates.is_empty() {
        let dates: Vec<&str> = bundle.dates.iter().map(|d| d.raw()).collect();
        output.push_str(&format!("Dates: {}\n", dates.join(", ")));
    }
    if !bundle.amounts.is_empty() {
        let amounts: Vec<&str> = bundle.amounts.iter().map(|a| a.text.as_str()).collect();
        output.push_str(&format!("Amounts: {}\n", amounts.join(", ")));
    }

    output
}
