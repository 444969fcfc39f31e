use anyhow::Result;
use clap::Parser;
use hoops_ingest::{prepare_game_logs, GameLogPaths};
use std::path::PathBuf;

/// Clean raw game log exports and generate their table definitions
#[derive(Parser, Debug)]
#[command(name = "prepare_game_logs")]
struct Args {
    /// Directory holding game_logs_<year>.csv files [default: data/game_logs]
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory for the cleaned per-season CSVs [default: scripts/db/output]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// File to write the create table statements to
    /// [default: scripts/db/create_game_logs_tables.sql]
    #[arg(long)]
    sql_file: Option<PathBuf>,
}

impl Args {
    fn into_paths(self) -> GameLogPaths {
        let defaults = GameLogPaths::default();
        GameLogPaths {
            input_dir: self.input_dir.unwrap_or(defaults.input_dir),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            sql_file: self.sql_file.unwrap_or(defaults.sql_file),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let paths = Args::parse().into_paths();

    let tables = prepare_game_logs(&paths)?;
    if tables.is_empty() {
        println!("No game log files found in {}", paths.input_dir.display());
    } else {
        for table in &tables {
            println!("{}: {} games", table.table_name(), table.rows.len());
        }
        println!("\nSQL table definitions written to {}", paths.sql_file.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_args_fall_back_to_default_paths() {
        let paths = Args::parse_from(["prepare_game_logs", "--output-dir", "/tmp/out"]).into_paths();
        assert_eq!(paths.input_dir, GameLogPaths::default().input_dir);
        assert_eq!(paths.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(paths.sql_file, GameLogPaths::default().sql_file);
    }
}
