use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::models::{AdvancedStatRow, PerGameStatRow};

/// One CSV record keyed by (trimmed) column header
pub type CsvRow = HashMap<String, String>;

static SHORT_SEASON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("season pattern is valid"));

const SUMMARY_MARKER: &str = "Yrs";

/// Why a row was left out of the load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingSeasonOrTeam,
    CareerSummary,
    MalformedSeason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDisposition {
    Accepted,
    Rejected(RejectReason),
}

/// Decide whether a row is a real season/team stint
pub fn classify_row(row: &CsvRow) -> RowDisposition {
    let season = row.get("Season").map(String::as_str).unwrap_or("");
    let team = row.get("Team").map(String::as_str).unwrap_or("");

    if season.is_empty() || team.is_empty() {
        return RowDisposition::Rejected(RejectReason::MissingSeasonOrTeam);
    }
    if season.contains(SUMMARY_MARKER) || team.contains(SUMMARY_MARKER) {
        return RowDisposition::Rejected(RejectReason::CareerSummary);
    }
    if !SHORT_SEASON_RE.is_match(season) {
        return RowDisposition::Rejected(RejectReason::MalformedSeason);
    }
    RowDisposition::Accepted
}

/// A typed record plus the columns that were empty and filled with 0
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub record: T,
    pub defaulted: Vec<&'static str>,
}

/// Counts from pushing one export through filter and transform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSummary {
    pub read: usize,
    pub rejected: usize,
    pub failed: usize,
    pub defaulted_fields: usize,
}

struct RowReader<'a> {
    row: &'a CsvRow,
    defaulted: Vec<&'static str>,
}

impl<'a> RowReader<'a> {
    fn new(row: &'a CsvRow) -> Self {
        Self {
            row,
            defaulted: Vec::new(),
        }
    }

    fn error(&self, detail: String) -> IngestError {
        IngestError::RowTransform {
            season: self.row.get("Season").cloned().unwrap_or_default(),
            team: self.row.get("Team").cloned().unwrap_or_default(),
            detail,
        }
    }

    fn raw(&self, column: &'static str) -> Result<&'a str, IngestError> {
        self.row
            .get(column)
            .map(|value| value.trim())
            .ok_or_else(|| self.error(format!("missing column {:?}", column)))
    }

    fn text(&self, column: &'static str) -> Result<String, IngestError> {
        self.raw(column).map(str::to_string)
    }

    fn optional_text(&self, column: &'static str) -> Option<String> {
        self.row
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn float(&mut self, column: &'static str) -> Result<f64, IngestError> {
        let value = self.raw(column)?;
        if value.is_empty() {
            self.defaulted.push(column);
            return Ok(0.0);
        }
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.error(format!("column {:?} is not a number: {:?}", column, value)))
    }

    fn int(&mut self, column: &'static str) -> Result<i32, IngestError> {
        let value = self.raw(column)?;
        if value.is_empty() {
            self.defaulted.push(column);
            return Ok(0);
        }
        if let Ok(v) = value.parse::<i32>() {
            return Ok(v);
        }
        // Some exports write whole numbers as "25.0"
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i32)
            .ok_or_else(|| {
                self.error(format!("column {:?} is not an integer: {:?}", column, value))
            })
    }

    fn finish<T>(self, record: T) -> Normalized<T> {
        Normalized {
            record,
            defaulted: self.defaulted,
        }
    }
}

/// Map a filtered per_game.csv row onto `PerGameStatRow`
pub fn transform_per_game(row: &CsvRow) -> Result<Normalized<PerGameStatRow>, IngestError> {
    let mut r = RowReader::new(row);
    let record = PerGameStatRow {
        season: r.text("Season")?,
        age: r.int("Age")?,
        team: r.text("Team")?,
        league: r.text("Lg")?,
        position: r.text("Pos")?,
        games: r.int("G")?,
        games_started: r.int("GS")?,
        minutes_per_game: r.float("MP")?,
        field_goals: r.float("FG")?,
        field_goal_attempts: r.float("FGA")?,
        field_goal_percentage: r.float("FG%")?,
        three_pointers: r.float("3P")?,
        three_point_attempts: r.float("3PA")?,
        three_point_percentage: r.float("3P%")?,
        two_pointers: r.float("2P")?,
        two_point_attempts: r.float("2PA")?,
        two_point_percentage: r.float("2P%")?,
        effective_field_goal_percentage: r.float("eFG%")?,
        free_throws: r.float("FT")?,
        free_throw_attempts: r.float("FTA")?,
        free_throw_percentage: r.float("FT%")?,
        offensive_rebounds: r.float("ORB")?,
        defensive_rebounds: r.float("DRB")?,
        total_rebounds: r.float("TRB")?,
        assists: r.float("AST")?,
        steals: r.float("STL")?,
        blocks: r.float("BLK")?,
        turnovers: r.float("TOV")?,
        personal_fouls: r.float("PF")?,
        points: r.float("PTS")?,
        awards: r.optional_text("Awards"),
    };
    Ok(r.finish(record))
}

/// Map a filtered advanced.csv row onto `AdvancedStatRow`
pub fn transform_advanced(row: &CsvRow) -> Result<Normalized<AdvancedStatRow>, IngestError> {
    let mut r = RowReader::new(row);
    let record = AdvancedStatRow {
        season: r.text("Season")?,
        age: r.int("Age")?,
        team: r.text("Team")?,
        league: r.text("Lg")?,
        position: r.text("Pos")?,
        games: r.int("G")?,
        games_started: r.int("GS")?,
        minutes_played: r.int("MP")?,
        player_efficiency_rating: r.float("PER")?,
        true_shooting_percentage: r.float("TS%")?,
        three_point_attempt_rate: r.float("3PAr")?,
        free_throw_rate: r.float("FTr")?,
        offensive_rebound_percentage: r.float("ORB%")?,
        defensive_rebound_percentage: r.float("DRB%")?,
        total_rebound_percentage: r.float("TRB%")?,
        assist_percentage: r.float("AST%")?,
        steal_percentage: r.float("STL%")?,
        block_percentage: r.float("BLK%")?,
        turnover_percentage: r.float("TOV%")?,
        usage_percentage: r.float("USG%")?,
        offensive_win_shares: r.float("OWS")?,
        defensive_win_shares: r.float("DWS")?,
        win_shares: r.float("WS")?,
        win_shares_per_48: r.float("WS/48")?,
        offensive_box_plus_minus: r.float("OBPM")?,
        defensive_box_plus_minus: r.float("DBPM")?,
        box_plus_minus: r.float("BPM")?,
        value_over_replacement: r.float("VORP")?,
        awards: r.optional_text("Awards"),
    };
    Ok(r.finish(record))
}

/// Filter then transform every row, logging and skipping the ones that fail
pub fn normalize_rows<T, F>(rows: &[CsvRow], label: &str, transform: F) -> (Vec<T>, RowSummary)
where
    F: Fn(&CsvRow) -> Result<Normalized<T>, IngestError>,
{
    let mut summary = RowSummary {
        read: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        if let RowDisposition::Rejected(reason) = classify_row(row) {
            debug!(
                "{}: skipping {:?} row (season {:?})",
                label,
                reason,
                row.get("Season")
            );
            summary.rejected += 1;
            continue;
        }

        match transform(row) {
            Ok(normalized) => {
                summary.defaulted_fields += normalized.defaulted.len();
                records.push(normalized.record);
            }
            Err(e) => {
                warn!("{}: {}", label, e);
                summary.failed += 1;
            }
        }
    }

    (records, summary)
}
