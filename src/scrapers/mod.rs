pub mod player_profile;
pub mod season_logs;
pub mod stat_tables;
