//! Command-line interface definitions for the `rodong` binary.

use clap::{Parser, Subcommand};
use rodong::Revision;

/// Read articles from the English edition of Rodong Sinmun.
///
/// # Examples
///
/// ```sh
/// # List the section identifiers
/// rodong sections
///
/// # Titles and URLs of every editorial, as JSON
/// rodong list editorial --json
///
/// # Text and photos of the newest editorial, using the redesign layout
/// rodong --revision redesign show editorial 0
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// User-Agent header sent with every request (overrides the config file)
    #[arg(long, env = "RODONG_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Built-in site layout: classic or redesign (overrides the config file)
    #[arg(long)]
    pub revision: Option<Revision>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the valid section identifiers
    Sections,

    /// Print the title and URL of every article in a section
    List {
        section: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load one article and print its text and photo URLs
    Show {
        section: String,

        /// Position of the article in the section listing, starting at 0
        index: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
