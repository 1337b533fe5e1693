use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use venue_allocator::domain::session::Session;
use venue_allocator::{load_catalog, logger};

/// Allocate events to venues and watch the corridor traffic they cause.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Venue description (`.json` or the line format).
    #[arg(long, default_value = "venues.txt")]
    venues: PathBuf,

    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the final traffic report to this CSV file.
    #[arg(long)]
    report_csv: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level.as_deref());

    let catalog = load_catalog(&args.venues).with_context(|| format!("cannot load venues from '{}'", args.venues.display()))?;
    let mut session = Session::new(Arc::new(catalog));

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| format!("cannot open script '{}'", path.display()))?)),
        None => Box::new(io::stdin().lock()),
    };

    for line in input.lines() {
        let line = line.context("failed to read command")?;

        match session.execute_line(&line) {
            Ok(Some(response)) => print!("{}", response),
            Ok(None) => {}
            Err(e) => eprintln!("{} {}", "error:".red().bold(), e),
        }
    }

    if let Some(path) = &args.report_csv {
        let file = File::create(path).with_context(|| format!("cannot create report '{}'", path.display()))?;
        session.traffic().write_csv(file)?;
        log::info!("Traffic report written to '{}'.", path.display());
    }

    Ok(())
}
