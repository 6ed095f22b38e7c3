//! # rodong
//!
//! Command-line front end for the `rodong` library: list the sections of the
//! English Rodong Sinmun site, the articles in a section, or the text and
//! photos of one article.
//!
//! ## Usage
//!
//! ```sh
//! rodong sections
//! rodong list editorial
//! rodong show editorial 0 --json
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level, default `info`), so
//! stdout can be piped.

use clap::Parser;
use rodong::{ArticleSummary, Config, Error as ScrapeError, SectionCatalog};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let catalog = SectionCatalog::from_config(&config)?;
    info!(profile = %catalog.profile().name, user_agent = %config.user_agent, "Catalog ready");

    if let Err(e) = run(&catalog, &args.command) {
        error!(error = %e, "Command failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

/// Config file (if any) with command-line overrides applied.
fn resolve_config(args: &Cli) -> Result<Config, ScrapeError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(revision) = args.revision {
        config.revision = revision;
        // an explicit revision wins over a custom site block
        config.site = None;
    }
    Ok(config)
}

#[instrument(level = "info", skip(catalog))]
fn run(catalog: &SectionCatalog, command: &Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Sections => {
            for key in catalog.keys() {
                println!("{key}");
            }
        }
        Command::List { section, json } => {
            let summaries: Vec<ArticleSummary> = catalog
                .get(section)?
                .iter()
                .enumerate()
                .map(|(index, article)| ArticleSummary {
                    index,
                    section: section.clone(),
                    title: article.title().to_string(),
                    url: article.url().to_string(),
                })
                .collect();
            if *json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                for s in &summaries {
                    println!("{:>4}  {}\n      {}", s.index, s.title, s.url);
                }
            }
        }
        Command::Show {
            section,
            index,
            json,
        } => {
            let articles = catalog.get(section)?;
            let article = articles.get(*index).ok_or_else(|| {
                format!(
                    "section {section} has {} articles; index {index} is out of range",
                    articles.len()
                )
            })?;
            let record = article.snapshot()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}\n{}\n", record.title, record.url);
                println!("{}", record.text);
                if !record.photos.is_empty() {
                    println!();
                    for photo in &record.photos {
                        println!("{photo}");
                    }
                }
            }
        }
    }
    Ok(())
}
