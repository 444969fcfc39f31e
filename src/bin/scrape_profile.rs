use anyhow::{Context, Result};
use clap::Parser;
use hoops_ingest::utils::data::save_json;
use hoops_ingest::{extract_player_tables, parse_profile, save_player_tables, PlayerProfileScraper};
use std::path::PathBuf;

/// Extract a player's bio and career stat tables from a basketball-reference page
#[derive(Parser, Debug)]
#[command(name = "scrape_profile")]
struct Args {
    /// Saved HTML copy of the player page
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    html_file: Option<PathBuf>,

    /// Fetch the page instead of reading a saved copy
    #[arg(long)]
    url: Option<String>,

    /// Where to write the profile JSON
    #[arg(long, default_value = "data/player_info.json")]
    output: PathBuf,

    /// Directory for the stat table CSVs (per_game.csv, advanced.csv, ...)
    #[arg(long, default_value = "data/regular-season")]
    tables_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let html = match (&args.url, &args.html_file) {
        (Some(url), _) => PlayerProfileScraper::new().fetch_page(url).await?,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either an HTML file or --url is required"),
    };

    let profile = parse_profile(&html)?;
    save_json(&profile, &args.output)?;
    println!(
        "Saved profile for {} to {}",
        profile.full_name.as_deref().unwrap_or("unknown player"),
        args.output.display()
    );

    let tables = extract_player_tables(&html)?;
    let written = save_player_tables(&tables, &args.tables_dir)?;
    println!(
        "Saved {} stat tables to {}",
        written.len(),
        args.tables_dir.display()
    );

    Ok(())
}
