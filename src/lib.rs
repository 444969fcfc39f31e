pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod scrapers;
pub mod utils;

pub use api::{RecordStore, StoreError, SupabaseClient};
pub use config::Config;
pub use error::IngestError;
pub use jobs::*;
pub use models::*;
pub use scrapers::player_profile::{parse_profile, PlayerProfileScraper};
pub use scrapers::season_logs::SeasonLogScraper;
pub use scrapers::stat_tables::{extract_player_tables, save_player_tables, HtmlTable};
