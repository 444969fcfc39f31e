use anyhow::Result;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::scrapers::season_logs::{short_season, Lineups, SeasonLogScraper};
use crate::scrapers::stat_tables::HtmlTable;
use crate::utils::data::save_json;

/// Tables scraped for one season. A page that failed or had no table is `None`.
#[derive(Debug, Clone, Default)]
pub struct SeasonPages {
    pub game_log: Option<HtmlTable>,
    pub advanced_log: Option<HtmlTable>,
    pub lineups: Lineups,
    pub on_off: Option<HtmlTable>,
}

/// Files written for one season
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonLogSummary {
    pub season_end: i32,
    pub written: Vec<PathBuf>,
}

/// Where each season file goes under the output directory
pub fn game_log_path(out_dir: &Path, season_end: i32) -> PathBuf {
    out_dir
        .join("game_logs")
        .join(format!("game_logs_{}.csv", season_end))
}

/// Write whatever a season produced. Game logs use the
/// `game_logs_<year>.csv` name the preparation job scans for.
pub fn save_season_pages(
    out_dir: &Path,
    season_end: i32,
    pages: &SeasonPages,
) -> Result<SeasonLogSummary> {
    let season = short_season(season_end);
    let mut written = Vec::new();

    if let Some(table) = &pages.game_log {
        let path = game_log_path(out_dir, season_end);
        table.save_csv(&path)?;
        written.push(path);
    }
    if let Some(table) = &pages.advanced_log {
        let path = out_dir
            .join("advanced_logs")
            .join(format!("advanced_{}.csv", season));
        table.save_csv(&path)?;
        written.push(path);
    }
    if !pages.lineups.is_empty() {
        let path = out_dir
            .join("lineups")
            .join(format!("lineups_{}.json", season));
        save_json(&pages.lineups, &path)?;
        written.push(path);
    }
    if let Some(table) = &pages.on_off {
        let path = out_dir.join("on_off").join(format!("on_off_{}.csv", season));
        table.save_csv(&path)?;
        written.push(path);
    }

    for path in &written {
        info!("Saved {}", path.display());
    }
    Ok(SeasonLogSummary {
        season_end,
        written,
    })
}

fn page_or_warn<T>(season: &str, page: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} {}: {:#}", season, page, e);
            None
        }
    }
}

/// Scrape each season in `seasons` (ending years), pausing `delay` between them.
/// A page that fails is logged and the rest of the season still runs.
pub async fn scrape_season_logs(
    scraper: &SeasonLogScraper,
    out_dir: &Path,
    seasons: RangeInclusive<i32>,
    delay: Duration,
) -> Result<Vec<SeasonLogSummary>> {
    let mut summaries = Vec::new();

    for season_end in seasons {
        if !summaries.is_empty() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let season = short_season(season_end);
        info!("Scraping {} season", season);

        let pages = SeasonPages {
            game_log: page_or_warn(&season, "game log", scraper.fetch_game_log(season_end).await)
                .flatten(),
            advanced_log: page_or_warn(
                &season,
                "advanced log",
                scraper.fetch_advanced_log(season_end).await,
            )
            .flatten(),
            lineups: page_or_warn(&season, "lineups", scraper.fetch_lineups(season_end).await)
                .unwrap_or_default(),
            on_off: page_or_warn(&season, "on/off", scraper.fetch_on_off(season_end).await)
                .flatten(),
        };
        if pages.game_log.is_none() {
            warn!("No game log table found for {}", season);
        }

        summaries.push(save_season_pages(out_dir, season_end, &pages)?);
    }

    Ok(summaries)
}
