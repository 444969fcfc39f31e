use anyhow::Result;
use clap::Parser;
use hoops_ingest::{scrape_season_logs, SeasonLogScraper};
use std::path::PathBuf;
use std::time::Duration;

/// Scrape per-season game logs, lineups and on/off splits for one player
#[derive(Parser, Debug)]
#[command(name = "scrape_season_logs")]
struct Args {
    /// Player page path on basketball-reference
    #[arg(long, default_value = "/players/d/davisan02")]
    player: String,

    /// Ending year of the first season to scrape (2013 for 2012-13)
    #[arg(long, default_value_t = 2013)]
    first: i32,

    /// Ending year of the last season to scrape
    #[arg(long, default_value_t = 2025)]
    last: i32,

    /// Directory the per-season folders are created in
    #[arg(long, default_value = "data")]
    output_dir: PathBuf,

    /// Pause between seasons, in seconds
    #[arg(long, default_value_t = 2)]
    delay_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    if args.first > args.last {
        anyhow::bail!("--first ({}) is after --last ({})", args.first, args.last);
    }

    let scraper = SeasonLogScraper::new(&args.player);
    let summaries = scrape_season_logs(
        &scraper,
        &args.output_dir,
        args.first..=args.last,
        Duration::from_secs(args.delay_secs),
    )
    .await?;

    for summary in &summaries {
        println!("{}: {} files", summary.season_end, summary.written.len());
    }
    println!("\nGame logs are ready for prepare_game_logs in {}", args.output_dir.join("game_logs").display());

    Ok(())
}
