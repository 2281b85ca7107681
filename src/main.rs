use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::Path;

mod client;
mod detail;
mod html;
mod query;
mod search;
mod types;

use client::PatentClient;
use query::SearchQuery;

pub const LINKS_FILE: &str = "links_to_recent_patents.txt";
pub const OUTPUT_FILE: &str = "recent_patents.json";

#[derive(Parser)]
#[command(name = "uspto-patents")]
#[command(about = "USPTO patent award scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recent awards for a city and save the detail-page links
    Links {
        /// Inventor city to search for
        #[arg(long, default_value = "Austin")]
        city: String,
        /// Two-letter state abbreviation
        #[arg(long, default_value = "TX")]
        state: String,
        /// How many days back the award window reaches
        #[arg(long, default_value_t = 7)]
        days: i64,
        /// Output links file
        #[arg(short, long, default_value = LINKS_FILE)]
        output: String,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Fetch each saved link and extract patent fields into JSON
    Details {
        /// Links file produced by the links stage
        #[arg(long, default_value = LINKS_FILE)]
        links: String,
        /// Output JSON file
        #[arg(short, long, default_value = OUTPUT_FILE)]
        output: String,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Search and extract in one go
    Run {
        /// Inventor city to search for
        #[arg(long, default_value = "Austin")]
        city: String,
        /// Two-letter state abbreviation
        #[arg(long, default_value = "TX")]
        state: String,
        /// How many days back the award window reaches
        #[arg(long, default_value_t = 7)]
        days: i64,
        /// Intermediate links file
        #[arg(long, default_value = LINKS_FILE)]
        links: String,
        /// Output JSON file
        #[arg(short, long, default_value = OUTPUT_FILE)]
        output: String,
        /// Quiet mode - suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Links {
            city,
            state,
            days,
            output,
            quiet,
        } => {
            let query = SearchQuery::last_days(&city, &state, days, Local::now().date_naive())?;
            let client = PatentClient::new()?;
            search::run_links(&client, &query, Path::new(&output), quiet)?;
            Ok(())
        }
        Commands::Details {
            links,
            output,
            quiet,
        } => {
            let client = PatentClient::new()?;
            detail::run_details(&client, Path::new(&links), Path::new(&output), quiet)
        }
        Commands::Run {
            city,
            state,
            days,
            links,
            output,
            quiet,
        } => {
            let query = SearchQuery::last_days(&city, &state, days, Local::now().date_naive())?;
            // One client across both stages, so the delay spans the
            // stage boundary too.
            let client = PatentClient::new()?;
            let found = search::run_links(&client, &query, Path::new(&links), quiet)?;
            if found == 0 {
                return Ok(());
            }
            detail::run_details(&client, Path::new(&links), Path::new(&output), quiet)
        }
    }
}
