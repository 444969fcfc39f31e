use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::utils::game_logs::{prepare_season, render_sql, season_end_from_file_name, GameLogTable};

/// Where the preparation job reads from and writes to
#[derive(Debug, Clone)]
pub struct GameLogPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub sql_file: PathBuf,
}

impl Default for GameLogPaths {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/game_logs"),
            output_dir: PathBuf::from("scripts/db/output"),
            sql_file: PathBuf::from("scripts/db/create_game_logs_tables.sql"),
        }
    }
}

fn season_files(input_dir: &Path) -> Result<Vec<(i32, PathBuf)>> {
    let entries = std::fs::read_dir(input_dir)
        .with_context(|| format!("Failed to list {}", input_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let season_end = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(season_end_from_file_name);
        if let Some(season_end) = season_end {
            files.push((season_end, path));
        }
    }
    files.sort();
    Ok(files)
}

/// Clean every `game_logs_<year>.csv` and write per-season CSVs plus table DDL
pub fn prepare_game_logs(paths: &GameLogPaths) -> Result<Vec<GameLogTable>> {
    std::fs::create_dir_all(&paths.output_dir)
        .with_context(|| format!("Failed to create {}", paths.output_dir.display()))?;

    let mut tables = Vec::new();
    for (season_end, path) in season_files(&paths.input_dir)? {
        let file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let table = prepare_season(file, season_end)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let output = paths.output_dir.join(format!("{}.csv", table.table_name()));
        let out_file = File::create(&output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        table
            .write_csv(out_file)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(
            "Exported {}-{} data to {} ({} games)",
            table.season_start,
            table.season_end,
            output.display(),
            table.rows.len()
        );

        tables.push(table);
    }

    if let Some(parent) = paths.sql_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&paths.sql_file, render_sql(&tables))
        .with_context(|| format!("Failed to write {}", paths.sql_file.display()))?;
    info!("SQL table definitions exported to {}", paths.sql_file.display());

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
Rk,G,Date,Age,Tm,,Opp,,GS,MP,PTS
1,1,2013-10-30,20-233,NOP,,IND,L (-5),1,38:22,20
2,2,2013-11-01,20-235,NOP,@,ORL,W (+4),1,35:54,24
";

    #[test]
    fn test_prepare_game_logs_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("game_logs");
        std::fs::create_dir_all(&input_dir).unwrap();
        std::fs::write(input_dir.join("game_logs_2014.csv"), LOG).unwrap();
        std::fs::write(input_dir.join("game_logs_2013.csv"), LOG).unwrap();
        std::fs::write(input_dir.join("notes.txt"), "ignore me").unwrap();

        let paths = GameLogPaths {
            input_dir,
            output_dir: dir.path().join("out"),
            sql_file: dir.path().join("sql").join("tables.sql"),
        };
        let tables = prepare_game_logs(&paths).unwrap();

        let names: Vec<String> = tables.iter().map(GameLogTable::table_name).collect();
        assert_eq!(names, vec!["game_logs_2012_2013", "game_logs_2013_2014"]);
        assert!(paths.output_dir.join("game_logs_2013_2014.csv").exists());

        let sql = std::fs::read_to_string(&paths.sql_file).unwrap();
        assert!(sql.find("game_logs_2012_2013").unwrap() < sql.find("game_logs_2013_2014").unwrap());
        assert!(sql.contains("    pts integer,"));
    }
}
