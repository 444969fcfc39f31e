use serde::{Deserialize, Serialize};

/// Result of a shot attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotType {
    Make,
    Miss,
}

/// A shot event as it appears in the per-season shot chart export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawShot {
    pub game: String, // e.g. "Oct 31, 2012, NOH vs SAS"
    pub time: String, // e.g. "1st Qtr, 10:10 remaining"
    #[serde(rename = "type")]
    pub shot_type: ShotType,
    pub x: f64,
    pub y: f64,
    pub shot: String,
    pub score: String,
}

/// Normalized shot row for the `shots` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub x: f64,
    pub y: f64,
    pub shot_type: ShotType,
    pub game_date: String,
    pub season: String, // "YYYY-YYYY"
    pub quarter: String,
    pub time_remaining: String,
    pub shot_description: String,
    pub score_situation: String,
    pub distance: u32, // feet, 0 when the description has none
}

/// Per-game averages for one season and team stint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerGameStatRow {
    pub season: String, // "YYYY-YY"
    pub age: i32,
    pub team: String,
    pub league: String,
    pub position: String,
    pub games: i32,
    pub games_started: i32,
    pub minutes_per_game: f64,
    pub field_goals: f64,
    pub field_goal_attempts: f64,
    pub field_goal_percentage: f64,
    pub three_pointers: f64,
    pub three_point_attempts: f64,
    pub three_point_percentage: f64,
    pub two_pointers: f64,
    pub two_point_attempts: f64,
    pub two_point_percentage: f64,
    pub effective_field_goal_percentage: f64,
    pub free_throws: f64,
    pub free_throw_attempts: f64,
    pub free_throw_percentage: f64,
    pub offensive_rebounds: f64,
    pub defensive_rebounds: f64,
    pub total_rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
    pub personal_fouls: f64,
    pub points: f64,
    pub awards: Option<String>,
}

/// Advanced metrics for one season and team stint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedStatRow {
    pub season: String,
    pub age: i32,
    pub team: String,
    pub league: String,
    pub position: String,
    pub games: i32,
    pub games_started: i32,
    pub minutes_played: i32,
    pub player_efficiency_rating: f64,
    pub true_shooting_percentage: f64,
    pub three_point_attempt_rate: f64,
    pub free_throw_rate: f64,
    pub offensive_rebound_percentage: f64,
    pub defensive_rebound_percentage: f64,
    pub total_rebound_percentage: f64,
    pub assist_percentage: f64,
    pub steal_percentage: f64,
    pub block_percentage: f64,
    pub turnover_percentage: f64,
    pub usage_percentage: f64,
    pub offensive_win_shares: f64,
    pub defensive_win_shares: f64,
    pub win_shares: f64,
    pub win_shares_per_48: f64,
    pub offensive_box_plus_minus: f64,
    pub defensive_box_plus_minus: f64,
    pub box_plus_minus: f64,
    pub value_over_replacement: f64,
    pub awards: Option<String>,
}

/// Biographical details scraped from a player page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub full_name: Option<String>,
    pub instagram: Option<String>,
    pub nicknames: Vec<String>,
    pub position: Option<String>,
    pub shoots: Option<String>,
    pub height_ft_in: Option<String>,
    pub weight_lb: Option<String>,
    pub height_cm: Option<String>,
    pub weight_kg: Option<String>,
    /// Current team, from a `/teams/` link outside the draft line
    pub team: Option<String>,
    pub birth_date: Option<String>,
    pub birth_place: Option<String>,
    pub college: Option<String>,
    pub high_school: Option<String>,
    pub high_school_location: Option<String>,
    pub recruiting_rank_year: Option<String>,
    pub recruiting_rank: Option<String>,
    pub draft_team: Option<String>,
    pub draft_round: Option<String>,
    pub draft_pick: Option<String>,
    pub draft_overall: Option<String>,
    pub draft_year: Option<String>,
    pub nba_debut: Option<String>,
    pub experience: Option<String>,
}
