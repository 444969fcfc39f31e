use anyhow::Result;
use hoops_ingest::{ingest_season_stats, Config, SupabaseClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let store = SupabaseClient::from_config(&config);

    println!("Uploading regular season stats...\n");
    let summary = ingest_season_stats(&config, &store).await?;

    println!("\n{}", summary.format());
    println!("Successfully uploaded season stats!");

    Ok(())
}
