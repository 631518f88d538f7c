use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::data::DataClient;
use crate::error::DataResult;
use crate::estimate::{EstimatorConfig, GameClockState, HalfInning};
use crate::model::{
    CurrentPlay, FeedTeam, GameState, LiveFeedResponse, ScheduleResponse, ScheduledGame,
};

/// Triple-A.
pub const DEFAULT_SPORT_ID: u32 = 11;
/// Iowa Cubs.
pub const DEFAULT_TEAM_ID: u32 = 451;

/// What the dashboard shows: whether the team plays today, and if so the
/// current state of that game.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDataResponse {
    pub is_team_playing_today: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_home: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<GameInfo>,
}

impl GameDataResponse {
    pub fn not_playing() -> Self {
        Self {
            is_team_playing_today: false,
            is_home: None,
            game: None,
        }
    }

    pub fn playing(team_id: u32, feed: &LiveFeedResponse, estimator: &EstimatorConfig) -> Self {
        Self {
            is_team_playing_today: true,
            is_home: Some(feed.game_data.teams.home.id == team_id),
            game: Some(GameInfo::from_feed(feed, estimator)),
        }
    }

    /// Keep refreshing while there is a game today that hasn't finished.
    pub fn keep_polling(&self) -> bool {
        match &self.game {
            Some(game) => self.is_team_playing_today && !game.status.is_terminal(),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub datetime: Option<DateTime<Utc>>,
    pub status: GameState,
    pub remaining_time: u64,
    pub venue: String,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub play: PlayInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub name: String,
    pub id: u32,
}

impl From<&FeedTeam> for TeamRef {
    fn from(team: &FeedTeam) -> Self {
        Self {
            name: team.name.clone(),
            id: team.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayInfo {
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub half_inning: HalfInning,
    pub inning: u32,
    pub count: CountInfo,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountInfo {
    pub balls: Option<u32>,
    pub strikes: Option<u32>,
    pub outs: Option<u32>,
}

impl GameInfo {
    pub fn from_feed(feed: &LiveFeedResponse, estimator: &EstimatorConfig) -> Self {
        let data = &feed.game_data;
        let current = feed.live_data.plays.current_play.as_ref();
        let clock = clock_state(current);

        // Before first pitch there is nothing to project from.
        let remaining_time = current.map(|_| estimator.estimate(&clock)).unwrap_or(0);

        Self {
            datetime: data.datetime.date_time,
            status: data.status.state(),
            remaining_time,
            venue: data.venue.name.clone(),
            home_team: TeamRef::from(&data.teams.home),
            away_team: TeamRef::from(&data.teams.away),
            play: PlayInfo {
                home_score: current.and_then(|p| p.result.home_score),
                away_score: current.and_then(|p| p.result.away_score),
                half_inning: clock.current_inning_indicator,
                inning: clock.current_inning,
                count: CountInfo {
                    balls: current.map(|p| p.count.balls),
                    strikes: current.map(|p| p.count.strikes),
                    outs: current.map(|p| p.count.outs),
                },
            },
        }
    }
}

/// Clock state for the estimator. A feed without a current play (game not
/// started) maps to the top of the 1st with an empty count.
pub fn clock_state(current: Option<&CurrentPlay>) -> GameClockState {
    match current {
        Some(play) => GameClockState {
            current_inning: play.about.inning,
            current_inning_indicator: play.about.half_inning,
            strikes: play.count.strikes,
            balls: play.count.balls,
            outs: play.count.outs,
        },
        None => GameClockState::default(),
    }
}

/// Games on the schedule's closest date, if that date is `today`.
pub fn todays_games(schedule: ScheduleResponse, today: NaiveDate) -> Vec<ScheduledGame> {
    match schedule.dates.into_iter().next() {
        Some(date) if date.date == today => date.games,
        Some(date) => {
            debug!(closest = %date.date, %today, "no games scheduled today");
            Vec::new()
        }
        None => Vec::new(),
    }
}

pub fn find_game_for_team(games: &[ScheduledGame], team_id: u32) -> Option<&ScheduledGame> {
    games
        .iter()
        .find(|g| g.teams.home.team.id == team_id || g.teams.away.team.id == team_id)
}

/// Locates one team's game of the day and projects it into a [`GameDataResponse`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    client: DataClient,
    team_id: u32,
    sport_id: u32,
    estimator: EstimatorConfig,
}

impl Aggregator {
    pub fn new(
        client: DataClient,
        team_id: u32,
        sport_id: u32,
        estimator: EstimatorConfig,
    ) -> Self {
        Self {
            client,
            team_id,
            sport_id,
            estimator,
        }
    }

    pub fn client(&self) -> &DataClient {
        &self.client
    }

    pub async fn fetch_game_data(&self, today: NaiveDate) -> DataResult<GameDataResponse> {
        let schedule = self.client.fetch_schedule(self.sport_id).await?;
        let games = todays_games(schedule, today);

        let Some(game) = find_game_for_team(&games, self.team_id) else {
            info!(team_id = self.team_id, %today, "team is not playing today");
            return Ok(GameDataResponse::not_playing());
        };

        let feed = self.client.fetch_live_feed(game.game_pk).await?;
        let response = GameDataResponse::playing(self.team_id, &feed, &self.estimator);
        if let Some(info) = &response.game {
            debug!(
                game_pk = game.game_pk,
                status = %info.status,
                remaining_ms = info.remaining_time,
                "fetched live feed"
            );
        }
        Ok(response)
    }
}
