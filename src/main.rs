mod db;
mod error;
mod fetch;
mod parser;
mod scrape;

use std::time::Instant;

use clap::{Parser, Subcommand};

use crate::fetch::CachedClient;
use crate::parser::roster::IdStrategy;
use crate::scrape::ScrapeConfig;

#[derive(Parser)]
#[command(name = "senate_roster", about = "Thai NLA senate roster scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the roster: page count, honorifics, then every listing page
    Scrape {
        /// Max listing pages to scrape (default: all discovered)
        #[arg(short = 'n', long)]
        pages: Option<usize>,
        /// Keep stored members instead of dropping the table at run start
        #[arg(long)]
        keep_existing: bool,
        /// Derive member ids from photo filenames instead of the site id column
        #[arg(long)]
        id_from_image: bool,
        /// Listing page URL template ({PAGE-NUMBER} is substituted, 1-based)
        #[arg(long, default_value = scrape::DEFAULT_LISTING_URL)]
        listing_url: String,
        /// Honorific source article
        #[arg(long, default_value = scrape::DEFAULT_WIKI_URL)]
        wiki_url: String,
        /// Party label stored on every record
        #[arg(long, default_value = "NCPO")]
        party: String,
        /// Term label stored on every record
        #[arg(long, default_value = "2557")]
        term: String,
    },
    /// Show store statistics
    Stats,
    /// Stored members overview table
    Roster {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape {
            pages,
            keep_existing,
            id_from_image,
            listing_url,
            wiki_url,
            party,
            term,
        } => {
            let conn = db::connect()?;
            let client = CachedClient::new();
            let cfg = ScrapeConfig {
                listing_url,
                wiki_url,
                party,
                term,
                id_strategy: if id_from_image {
                    IdStrategy::ImageFilename
                } else {
                    IdStrategy::SiteId
                },
                max_pages: pages,
                keep_existing,
            };
            let stats = scrape::run(&conn, &client, &cfg).await?;
            println!(
                "Done: {} members across {} pages ({} rows skipped, {} new wikinames).",
                stats.members, stats.pages, stats.skipped, stats.wikinames
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Members:    {}", s.members);
            println!("Honorifics: {}", s.honorifics);
            println!("Wikinames:  {}", s.wikinames);
            Ok(())
        }
        Commands::Roster { limit } => {
            let conn = db::connect()?;
            db::init_schema(&conn)?;
            let rows = db::fetch_roster(&conn, limit)?;
            if rows.is_empty() {
                println!("No members stored. Run 'scrape' first.");
                return Ok(());
            }

            println!(
                "{:>4} | {:<12} | {:<32} | {:<6} | {:<5}",
                "Id", "Honorific", "Name", "Party", "Term"
            );
            println!("{}", "-".repeat(70));
            for r in &rows {
                println!(
                    "{:>4} | {:<12} | {:<32} | {:<6} | {:<5}",
                    r.id,
                    truncate(&r.honorific_prefix, 12),
                    truncate(&r.name, 32),
                    r.party,
                    r.term
                );
            }
            println!("\n{} members", rows.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
