use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use image::DynamicImage;

use crate::game::{GameDataResponse, GameInfo};
use crate::poll::PollEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub team_id: u32,
    pub interval_secs: u64,
    pub data: Option<GameDataResponse>,
    pub last_updated: Option<DateTime<Local>>,
    pub last_error: Option<String>,
    pub polling: bool,
    pub logos: HashMap<u32, DynamicImage>,
    pub show_logos: bool,
    requested_logos: HashSet<u32>,
}

impl App {
    pub fn new(team_id: u32, interval_secs: u64) -> Self {
        Self {
            should_quit: false,
            team_id,
            interval_secs,
            data: None,
            last_updated: None,
            last_error: None,
            polling: true,
            logos: HashMap::new(),
            show_logos: true,
            requested_logos: HashSet::new(),
        }
    }

    pub fn on_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Some(Action::Quit)
            }
            KeyCode::Char('r') if self.polling => Some(Action::Refresh),
            KeyCode::Char('l') => {
                self.show_logos = !self.show_logos;
                None
            }
            _ => None,
        }
    }

    pub fn on_poll(&mut self, event: PollEvent<GameDataResponse>) {
        match event {
            PollEvent::Fetched { value, at } => {
                self.data = Some(value);
                self.last_updated = Some(at);
                self.last_error = None;
            }
            PollEvent::Failed(msg) => self.last_error = Some(msg),
            PollEvent::Stopped => self.polling = false,
        }
    }

    pub fn on_logo(&mut self, team_id: u32, img: DynamicImage) {
        self.logos.insert(team_id, img);
    }

    pub fn game(&self) -> Option<&GameInfo> {
        self.data.as_ref().and_then(|d| d.game.as_ref())
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none()
    }

    /// Team ids whose logos haven't been requested yet. Each id is handed out once.
    pub fn logos_to_fetch(&mut self) -> Vec<u32> {
        let Some(game) = self.game() else {
            return Vec::new();
        };
        let ids = [game.home_team.id, game.away_team.id];
        ids.into_iter()
            .filter(|id| self.requested_logos.insert(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::EstimatorConfig;
    use crate::model::LiveFeedResponse;

    const LIVE_FEED: &str = include_str!("../fixtures/live_feed.json");

    fn fetched() -> PollEvent<GameDataResponse> {
        let feed: LiveFeedResponse = serde_json::from_str(LIVE_FEED).unwrap();
        PollEvent::Fetched {
            value: GameDataResponse::playing(451, &feed, &EstimatorConfig::default()),
            at: Local::now(),
        }
    }

    #[test]
    fn loading_until_first_fetch() {
        let mut app = App::new(451, 10);
        assert!(app.is_loading());
        app.on_poll(PollEvent::Failed("boom".into()));
        assert!(app.is_loading());
        assert_eq!(app.last_error.as_deref(), Some("boom"));

        app.on_poll(fetched());
        assert!(!app.is_loading());
        assert!(app.last_error.is_none());
        assert!(app.last_updated.is_some());
        assert_eq!(app.game().map(|g| g.venue.as_str()), Some("Principal Park"));
    }

    #[test]
    fn stopped_disables_refresh() {
        let mut app = App::new(451, 10);
        assert_eq!(app.on_key(KeyCode::Char('r')), Some(Action::Refresh));
        app.on_poll(PollEvent::Stopped);
        assert!(!app.polling);
        assert_eq!(app.on_key(KeyCode::Char('r')), None);
    }

    #[test]
    fn keys() {
        let mut app = App::new(451, 10);
        app.on_key(KeyCode::Char('l'));
        assert!(!app.show_logos);
        assert_eq!(app.on_key(KeyCode::Char('x')), None);
        assert_eq!(app.on_key(KeyCode::Char('q')), Some(Action::Quit));
        assert!(app.should_quit);
    }

    #[test]
    fn logos_are_requested_once() {
        let mut app = App::new(451, 10);
        assert!(app.logos_to_fetch().is_empty());
        app.on_poll(fetched());
        assert_eq!(app.logos_to_fetch(), vec![451, 556]);
        assert!(app.logos_to_fetch().is_empty());
        app.on_poll(fetched());
        assert!(app.logos_to_fetch().is_empty());
    }
}
