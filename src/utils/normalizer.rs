use regex::Regex;
use std::sync::LazyLock;

use crate::error::IngestError;
use crate::models::{RawShot, ShotRecord};

static DISTANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from (\d+) ft").expect("distance pattern is valid"));

const MONTHS: [(&str, u32); 12] = [
    ("Jan", 1),
    ("Feb", 2),
    ("Mar", 3),
    ("Apr", 4),
    ("May", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Aug", 8),
    ("Sep", 9),
    ("Oct", 10),
    ("Nov", 11),
    ("Dec", 12),
];

/// First month that belongs to the season starting in the same calendar year
const SEASON_START_MONTH: u32 = 10;

/// Calendar date and long-form season derived from a game descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub date: String,   // "YYYY-MM-DD"
    pub season: String, // "YYYY-YYYY"
}

/// Period label and game clock split out of a time descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInfo {
    pub quarter: String,
    pub time_remaining: String,
}

pub fn month_number(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == abbrev)
        .map(|(_, number)| *number)
}

/// Long season label ("2012-2013") for a game played in `month` of `year`
pub fn season_label(year: i32, month: u32) -> String {
    if month >= SEASON_START_MONTH {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

/// Parse "Oct 31, 2012, NOH vs SAS" into a date and season.
/// The day is not checked against the month, so "Feb 30" passes through.
pub fn parse_game_info(descriptor: &str) -> Result<GameInfo, IngestError> {
    let (month_abbrev, rest) = descriptor
        .trim()
        .split_once(' ')
        .ok_or_else(|| IngestError::malformed_game(descriptor, "missing month"))?;

    let month = month_number(month_abbrev).ok_or_else(|| {
        IngestError::malformed_game(descriptor, format!("unknown month {:?}", month_abbrev))
    })?;

    let mut parts = rest.split(',').map(str::trim);
    let day = parts
        .next()
        .filter(|d| !d.is_empty() && d.len() <= 2 && d.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| IngestError::malformed_game(descriptor, "day must be one or two digits"))?;
    let year_text = parts
        .next()
        .filter(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| IngestError::malformed_game(descriptor, "year must be four digits"))?;
    let year: i32 = year_text
        .parse()
        .map_err(|_| IngestError::malformed_game(descriptor, "year must be four digits"))?;

    Ok(GameInfo {
        date: format!("{}-{:02}-{:0>2}", year_text, month, day),
        season: season_label(year, month),
    })
}

/// Split "1st Qtr, 10:10 remaining" into quarter and clock.
/// Without a ", " separator the quarter is empty and the input is kept as the clock.
pub fn parse_time_info(descriptor: &str) -> TimeInfo {
    match descriptor.split_once(", ") {
        Some((quarter, clock)) => TimeInfo {
            quarter: quarter.to_string(),
            time_remaining: clock.strip_suffix(" remaining").unwrap_or(clock).to_string(),
        },
        None => TimeInfo {
            quarter: String::new(),
            time_remaining: descriptor.to_string(),
        },
    }
}

/// Distance in feet from "... from 18 ft", if the description has one
pub fn find_distance(description: &str) -> Option<u32> {
    DISTANCE_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Distance in feet, 0 for dunks and layups described without one
pub fn extract_distance(description: &str) -> u32 {
    find_distance(description).unwrap_or(0)
}

/// Build the `shots` row for one raw shot event
pub fn normalize_shot(shot: &RawShot) -> Result<ShotRecord, IngestError> {
    let game = parse_game_info(&shot.game)?;
    let time = parse_time_info(&shot.time);

    Ok(ShotRecord {
        x: shot.x,
        y: shot.y,
        shot_type: shot.shot_type,
        game_date: game.date,
        season: game.season,
        quarter: time.quarter,
        time_remaining: time.time_remaining,
        shot_description: shot.shot.clone(),
        score_situation: shot.score.clone(),
        distance: extract_distance(&shot.shot),
    })
}
