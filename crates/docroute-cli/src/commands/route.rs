//! Route command - show where a document would be filed, without filing it.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use console::style;
use serde::Serialize;

use docroute_core::{
    load_document, AttributeBundle, DocumentExtractor, FileTextSource, NameResolver, RoutingEngine,
};

/// Arguments for the route command.
#[derive(Args)]
pub struct RouteArgs {
    /// Input file to analyze and route
    #[arg(required_unless_present = "bundle_json", conflicts_with = "bundle_json")]
    input: Option<PathBuf>,

    /// Route a bundle given as JSON instead of a file
    #[arg(long)]
    bundle_json: Option<String>,

    /// Destination root (overrides routing.base_path)
    #[arg(short, long)]
    base_path: Option<PathBuf>,

    /// Processing date used when the document has no date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print JSON instead of a listing
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RouteOutput {
    file_name: String,
    destinations: Vec<PathBuf>,
    rules: Vec<RuleMatch>,
}

#[derive(Serialize)]
struct RuleMatch {
    rule: &'static str,
    path: PathBuf,
}

pub fn run(args: RouteArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    super::override_base_path(&mut config, args.base_path.clone())?;

    let (bundle, extension) = match (&args.input, &args.bundle_json) {
        (Some(input), _) => {
            if !input.exists() {
                anyhow::bail!("Input file not found: {}", input.display());
            }
            let document = load_document(&FileTextSource::new(), input)?;
            let result = DocumentExtractor::from_config(&config.extraction).analyze(&document);
            for warning in &result.warnings {
                eprintln!("{} {}", style("⚠").yellow(), warning);
            }
            (result.bundle, document.extension())
        }
        (None, Some(json)) => {
            let bundle: AttributeBundle = serde_json::from_str(json)?;
            (bundle, None)
        }
        (None, None) => anyhow::bail!("Either an input file or --bundle-json is required"),
    };

    let now = super::processing_time(args.date);
    let engine = RoutingEngine::new(config.routing.clone());
    let explained = engine.route_explained(&bundle, now.date());
    let destinations = engine.route_at(&bundle, now.date());
    let file_name = NameResolver::from_config(&config.naming).canonical_name(
        &bundle,
        extension.as_deref(),
        now,
    );

    if args.json {
        let output = RouteOutput {
            file_name,
            destinations: destinations.into_iter().collect(),
            rules: explained
                .into_iter()
                .map(|(rule, path)| RuleMatch { rule, path })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if destinations.is_empty() {
        println!("{} No rule matched; the file would stay in place.", style("ℹ").blue());
        return Ok(());
    }

    println!("{} {}", style("Name:").bold(), file_name);
    println!("{}", style("Destinations:").bold());
    for path in &destinations {
        println!("  {}", path.display());
    }
    println!("{}", style("Matched rules:").bold());
    for (rule, path) in &explained {
        println!("  {:<20} {}", rule, style(path.display()).dim());
    }

    Ok(())
}
