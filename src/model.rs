use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::estimate::HalfInning;

// --- Schedule: /api/v1/schedule ---

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleResponse {
    pub total_items: u32,
    pub total_games: u32,
    pub total_games_in_progress: u32,
    pub dates: Vec<GameDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDate {
    pub date: NaiveDate,
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub game_pk: u64,
    #[serde(default)]
    pub official_date: Option<NaiveDate>,
    #[serde(default)]
    pub game_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: GameStatus,
    pub teams: ScheduleTeams,
    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub game_number: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTeams {
    pub home: ScheduleTeam,
    pub away: ScheduleTeam,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTeam {
    #[serde(default)]
    pub league_record: Option<LeagueRecord>,
    pub team: Team,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeagueRecord {
    pub wins: u32,
    pub losses: u32,
    pub pct: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStatus {
    pub abstract_game_state: String, // "Preview", "Live", "Final"
    pub detailed_state: String,
}

impl GameStatus {
    pub fn state(&self) -> GameState {
        GameState::from(self.detailed_state.as_str())
    }
}

/// `detailedState` as reported by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameState {
    Scheduled,
    PreGame,
    Warmup,
    InProgress,
    Final,
    GameOver,
    Postponed,
    Cancelled,
    Suspended(String),
    Other(String),
}

impl GameState {
    /// No more plays will happen today.
    pub fn is_terminal(&self) -> bool {
        match self {
            GameState::Final
            | GameState::GameOver
            | GameState::Postponed
            | GameState::Cancelled => true,
            GameState::Other(s) => s.starts_with("Final") || s.starts_with("Completed"),
            _ => false,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, GameState::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            GameState::Scheduled => "Scheduled",
            GameState::PreGame => "Pre-Game",
            GameState::Warmup => "Warmup",
            GameState::InProgress => "In Progress",
            GameState::Final => "Final",
            GameState::GameOver => "Game Over",
            GameState::Postponed => "Postponed",
            GameState::Cancelled => "Cancelled",
            GameState::Suspended(s) | GameState::Other(s) => s,
        }
    }
}

impl From<&str> for GameState {
    fn from(s: &str) -> Self {
        match s {
            "Scheduled" => GameState::Scheduled,
            "Pre-Game" => GameState::PreGame,
            "Warmup" => GameState::Warmup,
            "In Progress" => GameState::InProgress,
            "Final" => GameState::Final,
            "Game Over" => GameState::GameOver,
            "Postponed" => GameState::Postponed,
            "Cancelled" => GameState::Cancelled,
            s if s.starts_with("Suspended") => GameState::Suspended(s.to_string()),
            s => GameState::Other(s.to_string()),
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GameState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// --- Live feed: /api/v1.1/game/{gamePk}/feed/live ---

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFeedResponse {
    #[serde(default)]
    pub game_pk: u64,
    pub game_data: GameData,
    #[serde(default)]
    pub live_data: LiveData,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub teams: FeedTeams,
    pub datetime: GameDateTime,
    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub status: GameStatus,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTeams {
    pub home: FeedTeam,
    pub away: FeedTeam,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedTeam {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub record: Option<LeagueRecord>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDateTime {
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub original_date: Option<NaiveDate>,
    #[serde(default)]
    pub day_night: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub ampm: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveData {
    pub plays: Plays,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plays {
    pub current_play: Option<CurrentPlay>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentPlay {
    pub result: PlayResult,
    pub about: PlayAbout,
    pub count: Count,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayResult {
    pub away_score: Option<u32>,
    pub home_score: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayAbout {
    pub half_inning: HalfInning,
    pub is_top_inning: bool,
    pub inning: u32,
}

impl Default for PlayAbout {
    fn default() -> Self {
        Self {
            half_inning: HalfInning::Top,
            is_top_inning: true,
            inning: 1,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Count {
    pub balls: u32,
    pub strikes: u32,
    pub outs: u32,
}
