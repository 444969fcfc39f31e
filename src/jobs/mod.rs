pub mod game_logs;
pub mod season_logs;
pub mod season_stats;
pub mod shots;

pub use game_logs::{prepare_game_logs, GameLogPaths};
pub use season_logs::{save_season_pages, scrape_season_logs, SeasonLogSummary, SeasonPages};
pub use season_stats::{ingest_season_stats, StatsIngestSummary};
pub use shots::{ingest_shots, ShotIngestSummary};
