pub mod batch;
pub mod data;
pub mod game_logs;
pub mod normalizer;
pub mod stat_rows;
