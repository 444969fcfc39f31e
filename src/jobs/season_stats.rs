use anyhow::{Context, Result};
use tracing::info;

use crate::api::RecordStore;
use crate::config::Config;
use crate::utils::batch::load_all;
use crate::utils::data::read_csv_rows;
use crate::utils::stat_rows::{normalize_rows, transform_advanced, transform_per_game, RowSummary};

pub const PER_GAME_TABLE: &str = "per_game_stats";
pub const ADVANCED_TABLE: &str = "advanced_stats";

#[derive(Debug, Clone, Default)]
pub struct StatsIngestSummary {
    pub per_game: RowSummary,
    pub advanced: RowSummary,
    pub per_game_inserted: usize,
    pub advanced_inserted: usize,
}

impl StatsIngestSummary {
    pub fn format(&self) -> String {
        format!(
            "per_game_stats: {} inserted ({} read, {} filtered, {} failed) | \
             advanced_stats: {} inserted ({} read, {} filtered, {} failed)",
            self.per_game_inserted,
            self.per_game.read,
            self.per_game.rejected,
            self.per_game.failed,
            self.advanced_inserted,
            self.advanced.read,
            self.advanced.rejected,
            self.advanced.failed,
        )
    }
}

/// Load per_game.csv and advanced.csv into their tables.
/// Bad rows are skipped; a rejected table insert aborts the run.
pub async fn ingest_season_stats<S>(config: &Config, store: &S) -> Result<StatsIngestSummary>
where
    S: RecordStore + ?Sized,
{
    let per_game_rows =
        read_csv_rows(&config.per_game_file()).context("Failed to read per game stats")?;
    let advanced_rows =
        read_csv_rows(&config.advanced_file()).context("Failed to read advanced stats")?;

    info!("Processing per game stats...");
    let (per_game, per_game_summary) =
        normalize_rows(&per_game_rows, PER_GAME_TABLE, transform_per_game);

    info!("Processing advanced stats...");
    let (advanced, advanced_summary) =
        normalize_rows(&advanced_rows, ADVANCED_TABLE, transform_advanced);

    let per_game_inserted = load_all(store, PER_GAME_TABLE, &per_game)
        .await
        .context("Failed to upload per game stats")?;
    let advanced_inserted = load_all(store, ADVANCED_TABLE, &advanced)
        .await
        .context("Failed to upload advanced stats")?;

    Ok(StatsIngestSummary {
        per_game: per_game_summary,
        advanced: advanced_summary,
        per_game_inserted,
        advanced_inserted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::utils::batch::testing::FakeStore;

    const PER_GAME_CSV: &str = "\
Season,Age,Team,Lg,Pos,G,GS,MP,FG,FGA,FG%,3P,3PA,3P%,2P,2PA,2P%,eFG%,FT,FTA,FT%,ORB,DRB,TRB,AST,STL,BLK,TOV,PF,PTS,Awards
2012-13,19,NOH,NBA,PF,64,60,28.8,5.8,11.3,.516,0.0,0.1,,5.8,11.2,.519,.516,2.1,2.8,.751,2.6,5.6,8.2,1.0,1.2,1.8,1.4,2.1,13.5,
2013-14,20,NOP,NBA,PF,67,66,35.2,9.6,18.3,.519,0.0,0.1,.222,9.6,18.2,.522,.520,5.5,6.6,.791,3.1,6.9,10.0,1.6,1.3,2.8,1.6,3.0,20.8,AS
12 Yrs,,,,,,,,,,,,,,,,,,,,,,,,,,,,,,
";

    const ADVANCED_CSV: &str = "\
Season,Age,Team,Lg,Pos,G,GS,MP,PER,TS%,3PAr,FTr,ORB%,DRB%,TRB%,AST%,STL%,BLK%,TOV%,USG%,OWS,DWS,WS,WS/48,OBPM,DBPM,BPM,VORP,Awards
2012-13,19,NOH,NBA,PF,64,60,1846,21.7,.559,.005,.248,9.6,20.5,15.0,6.5,1.9,5.0,8.7,18.0,3.6,2.5,6.1,.159,1.0,1.2,2.2,1.6,
Career,,,,,,,,,,,,,,,,,,,,,,,,,,,,
";

    fn write_exports(dir: &std::path::Path) -> Config {
        let season_dir = dir.join("regular-season");
        std::fs::create_dir_all(&season_dir).unwrap();
        std::fs::write(season_dir.join("per_game.csv"), PER_GAME_CSV).unwrap();
        std::fs::write(season_dir.join("advanced.csv"), ADVANCED_CSV).unwrap();
        Config {
            supabase_url: "http://localhost".to_string(),
            service_key: "key".to_string(),
            data_dir: dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_ingest_season_stats() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_exports(dir.path());
        let store = FakeStore::default();

        let summary = ingest_season_stats(&config, &store).await.unwrap();

        assert_eq!(summary.per_game_inserted, 2);
        assert_eq!(summary.advanced_inserted, 1);
        assert_eq!(summary.per_game.rejected, 1);
        assert_eq!(summary.advanced.rejected, 1);
        assert_eq!(store.tables(), vec![PER_GAME_TABLE, ADVANCED_TABLE]);

        let calls = store.calls.lock().unwrap();
        let rookie = &calls[0].1[0];
        assert_eq!(rookie["three_point_percentage"], 0.0);
        assert!(rookie["awards"].is_null());
        assert_eq!(calls[0].1[1]["awards"], "AS");
        assert_eq!(calls[1].1[0]["minutes_played"], 1846);
    }

    #[tokio::test]
    async fn test_rejected_insert_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_exports(dir.path());
        let store = FakeStore::failing_on(vec![0]);

        let err = ingest_season_stats(&config, &store).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::BatchInsert { .. })
        ));
        // Advanced stats are never attempted after the first table fails
        assert_eq!(store.call_sizes().len(), 1);
    }
}
