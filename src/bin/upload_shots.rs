use anyhow::Result;
use clap::Parser;
use hoops_ingest::{ingest_shots, Config, SupabaseClient};

/// Upload one season's shot chart to the shots table
#[derive(Parser, Debug)]
#[command(name = "upload_shots")]
struct Args {
    /// Season year of the export, e.g. 2013 for shots_2013.json
    year: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Fail before touching any file if the store isn't configured
    let config = Config::from_env()?;
    let store = SupabaseClient::from_config(&config);

    println!("Uploading shots from {}\n", config.shots_file(args.year).display());
    let summary = ingest_shots(&config, &store, args.year).await?;

    println!("\n{}", summary.format());
    if summary.load.is_complete() {
        println!("Upload completed successfully!");
    } else {
        let source = config.shots_file(args.year);
        for range in &summary.failed_source_ranges {
            println!(
                "  failed shots {}..{} of {}",
                range.start,
                range.end,
                source.display()
            );
        }
    }

    Ok(())
}
