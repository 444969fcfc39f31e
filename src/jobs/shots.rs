use anyhow::{Context, Result};
use std::ops::Range;
use tracing::{info, warn};

use crate::api::RecordStore;
use crate::config::Config;
use crate::utils::batch::{load_in_batches, BatchReport, SHOT_BATCH_SIZE};
use crate::utils::data::load_shots;
use crate::utils::normalizer::normalize_shot;

pub const SHOTS_TABLE: &str = "shots";

/// What happened to one season's shot chart
#[derive(Debug, Clone)]
pub struct ShotIngestSummary {
    pub year: u16,
    pub read: usize,
    pub skipped: usize,
    pub load: BatchReport,
    /// Failed batches as positions in `shots_<year>.json`, skipped shots included
    pub failed_source_ranges: Vec<Range<usize>>,
}

impl ShotIngestSummary {
    pub fn format(&self) -> String {
        format!(
            "Season {}: read {} shots, skipped {} malformed, {}",
            self.year,
            self.read,
            self.skipped,
            self.load.format()
        )
    }
}

/// Load `shots_<year>.json` and insert it into the shots table in batches
pub async fn ingest_shots<S>(config: &Config, store: &S, year: u16) -> Result<ShotIngestSummary>
where
    S: RecordStore + ?Sized,
{
    let path = config.shots_file(year);
    let shots = load_shots(&path).context("Failed to load shot chart")?;
    info!("Processing {} shots from season {}", shots.len(), year);

    let mut records = Vec::with_capacity(shots.len());
    let mut source_index = Vec::with_capacity(shots.len());
    let mut skipped = 0;
    for (index, shot) in shots.iter().enumerate() {
        match normalize_shot(shot) {
            Ok(record) => {
                records.push(record);
                source_index.push(index);
            }
            Err(e) => {
                warn!("Skipping shot {}: {}", index, e);
                skipped += 1;
            }
        }
    }

    let load = load_in_batches(store, SHOTS_TABLE, &records, SHOT_BATCH_SIZE).await?;
    let failed_source_ranges = load
        .failed_ranges
        .iter()
        .filter(|range| !range.is_empty())
        .map(|range| source_index[range.start]..source_index[range.end - 1] + 1)
        .collect();

    Ok(ShotIngestSummary {
        year,
        read: shots.len(),
        skipped,
        load,
        failed_source_ranges,
    })
}
