use anyhow::{Context, Result};
use scraper::Html;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::stat_tables::{find_table, HtmlTable};

pub const BASKETBALL_REFERENCE_URL: &str = "https://www.basketball-reference.com";

const GAME_LOG_TABLE: &str = "pgl_basic";
const ADVANCED_LOG_TABLE: &str = "pgl_advanced";
const ON_OFF_TABLE: &str = "on-off";
const LINEUP_SIZES: &[u8] = &[5, 4, 3, 2];

/// Lineup tables keyed "5-man" .. "2-man"
pub type Lineups = BTreeMap<String, Vec<Map<String, Value>>>;

/// "2012-13" for the season ending in 2013
pub fn short_season(season_end: i32) -> String {
    format!("{}-{:02}", season_end - 1, season_end.rem_euclid(100))
}

/// Regular season game log. The blank home/away and result columns stay in
/// place so the game-log preparer can read them; repeated header rows go.
pub fn parse_game_log(html: &str) -> Result<Option<HtmlTable>> {
    let document = Html::parse_document(html);
    Ok(find_table(&document, GAME_LOG_TABLE)?.map(|table| table.retain_rows_with("Rk")))
}

/// Advanced game log with the rank and unnamed columns dropped
pub fn parse_advanced_log(html: &str) -> Result<Option<HtmlTable>> {
    let document = Html::parse_document(html);
    Ok(find_table(&document, ADVANCED_LOG_TABLE)?.map(|table| {
        table
            .retain_rows_with("Rk")
            .without_columns(&["Rk"])
            .without_unnamed_columns()
    }))
}

pub fn parse_lineups(html: &str) -> Result<Lineups> {
    let document = Html::parse_document(html);
    let mut lineups = Lineups::new();
    for size in LINEUP_SIZES {
        if let Some(table) = find_table(&document, &format!("lineups-{}-man", size))? {
            lineups.insert(format!("{}-man", size), table.to_records());
        }
    }
    Ok(lineups)
}

pub fn parse_on_off(html: &str) -> Result<Option<HtmlTable>> {
    let document = Html::parse_document(html);
    find_table(&document, ON_OFF_TABLE)
}

/// Fetches the per-season pages (game logs, lineups, on/off) for one player
pub struct SeasonLogScraper {
    client: reqwest::Client,
    player_url: String,
}

impl SeasonLogScraper {
    /// `player_path` is the page path without extension, e.g. "/players/d/davisan02"
    pub fn new(player_path: &str) -> Self {
        Self::with_base_url(BASKETBALL_REFERENCE_URL, player_path)
    }

    pub fn with_base_url(base_url: &str, player_path: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .build()
                .unwrap_or_default(),
            player_url: format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                player_path.trim_matches('/').trim_end_matches(".html")
            ),
        }
    }

    /// URL of one of the player's season pages, e.g. `gamelog` for 2013
    pub fn page_url(&self, page: &str, season_end: i32) -> String {
        format!("{}/{}/{}", self.player_url, page, season_end)
    }

    async fn fetch_page(&self, page: &str, season_end: i32) -> Result<String> {
        let url = self.page_url(page, season_end);
        self.client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", url))?
            .text()
            .await
            .with_context(|| format!("Failed to read {}", url))
    }

    pub async fn fetch_game_log(&self, season_end: i32) -> Result<Option<HtmlTable>> {
        parse_game_log(&self.fetch_page("gamelog", season_end).await?)
    }

    pub async fn fetch_advanced_log(&self, season_end: i32) -> Result<Option<HtmlTable>> {
        parse_advanced_log(&self.fetch_page("gamelog-advanced", season_end).await?)
    }

    pub async fn fetch_lineups(&self, season_end: i32) -> Result<Lineups> {
        parse_lineups(&self.fetch_page("lineups", season_end).await?)
    }

    pub async fn fetch_on_off(&self, season_end: i32) -> Result<Option<HtmlTable>> {
        parse_on_off(&self.fetch_page("on-off", season_end).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_LOG_PAGE: &str = r#"
<table id="pgl_basic">
  <thead><tr><th>Rk</th><th>G</th><th>Date</th><th>Age</th><th>Tm</th><th></th><th>Opp</th><th></th><th>GS</th><th>PTS</th></tr></thead>
  <tbody>
    <tr><th>1</th><td>1</td><td>2013-10-30</td><td>20-233</td><td>NOP</td><td></td><td>IND</td><td>L (-5)</td><td>1</td><td>20</td></tr>
    <tr class="thead"><th>Rk</th><th>G</th><th>Date</th><th>Age</th><th>Tm</th><th></th><th>Opp</th><th></th><th>GS</th><th>PTS</th></tr>
    <tr><th>2</th><td>2</td><td>2013-11-01</td><td>20-235</td><td>NOP</td><td>@</td><td>ORL</td><td>W (+4)</td><td>1</td><td>24</td></tr>
  </tbody>
</table>
<table id="pgl_advanced">
  <thead><tr><th>Rk</th><th>G</th><th>Date</th><th></th><th>Opp</th><th>TS%</th></tr></thead>
  <tbody>
    <tr><th>1</th><td>1</td><td>2013-10-30</td><td></td><td>IND</td><td>.544</td></tr>
    <tr><th></th><td>Did Not Play</td><td></td><td></td><td></td><td></td></tr>
  </tbody>
</table>
"#;

    const LINEUP_PAGE: &str = r#"
<table id="lineups-5-man">
  <thead><tr><th>Lineup</th><th>MP</th><th>PTS</th></tr></thead>
  <tbody><tr><td>A. Davis | J. Holiday</td><td>412:10</td><td>+8.5</td></tr></tbody>
</table>
<table id="lineups-2-man">
  <thead><tr><th>Lineup</th><th>MP</th><th>PTS</th></tr></thead>
  <tbody><tr><td>A. Davis | E. Gordon</td><td>900:00</td><td>-1.5</td></tr></tbody>
</table>
"#;

    #[test]
    fn test_short_season() {
        assert_eq!(short_season(2013), "2012-13");
        assert_eq!(short_season(2000), "1999-00");
    }

    #[test]
    fn test_parse_game_log_keeps_home_away_column() {
        let table = parse_game_log(GAME_LOG_PAGE).unwrap().unwrap();

        assert_eq!(table.headers.len(), 10);
        assert_eq!(table.headers[5], "");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][5], "@");
    }

    #[test]
    fn test_game_log_output_feeds_preparer() {
        let table = parse_game_log(GAME_LOG_PAGE).unwrap().unwrap();
        let mut csv = Vec::new();
        table.write_csv(&mut csv).unwrap();

        let prepared = crate::utils::game_logs::prepare_season(csv.as_slice(), 2014).unwrap();
        assert_eq!(prepared.rows.len(), 2);
        assert_eq!(prepared.rows[1].last().map(String::as_str), Some("true"));
    }

    #[test]
    fn test_parse_advanced_log_drops_rank_and_unnamed() {
        let table = parse_advanced_log(GAME_LOG_PAGE).unwrap().unwrap();

        assert_eq!(table.headers, vec!["G", "Date", "Opp", "TS%"]);
        assert_eq!(table.rows, vec![vec!["1", "2013-10-30", "IND", ".544"]]);
    }

    #[test]
    fn test_parse_lineups() {
        let lineups = parse_lineups(LINEUP_PAGE).unwrap();

        let keys: Vec<&str> = lineups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2-man", "5-man"]);
        assert_eq!(lineups["5-man"][0]["Lineup"], "A. Davis | J. Holiday");
        assert_eq!(lineups["5-man"][0]["PTS"], 8.5);
        assert_eq!(lineups["2-man"][0]["MP"], "900:00");
    }

    #[test]
    fn test_missing_tables() {
        assert!(parse_on_off("<html><body></body></html>").unwrap().is_none());
        assert!(parse_lineups("<p>none</p>").unwrap().is_empty());
    }

    #[test]
    fn test_page_url() {
        let scraper = SeasonLogScraper::with_base_url("http://localhost:8080/", "/players/d/davisan02.html");
        assert_eq!(
            scraper.page_url("gamelog", 2013),
            "http://localhost:8080/players/d/davisan02/gamelog/2013"
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_game_log() {
        let scraper = SeasonLogScraper::new("/players/d/davisan02");
        let table = scraper.fetch_game_log(2013).await.unwrap();
        assert!(table.is_some_and(|t| !t.rows.is_empty()));
    }
}
