use std::time::Duration;

use image::DynamicImage;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DataError, DataResult};
use crate::model::{LiveFeedResponse, ScheduleResponse};

pub const MLB_STATS_API: &str = "https://statsapi.mlb.com";
const LOGO_BASE: &str = "https://midfield.mlbstatic.com/v1/team";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub struct DataClient {
    client: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(base_url: impl Into<String>) -> DataResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("ballgame-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DataError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn schedule_url(&self, sport_id: u32) -> String {
        format!("{}/api/v1/schedule?sportId={}", self.base_url, sport_id)
    }

    pub fn live_feed_url(&self, game_pk: u64) -> String {
        format!("{}/api/v1.1/game/{}/feed/live", self.base_url, game_pk)
    }

    pub async fn fetch_schedule(&self, sport_id: u32) -> DataResult<ScheduleResponse> {
        self.get_json(&self.schedule_url(sport_id)).await
    }

    pub async fn fetch_live_feed(&self, game_pk: u64) -> DataResult<LiveFeedResponse> {
        self.get_json(&self.live_feed_url(game_pk)).await
    }

    /// Team "spot" logo, a small square PNG.
    pub async fn fetch_logo(&self, team_id: u32) -> DataResult<DynamicImage> {
        let url = format!("{}/{}/spots/64", LOGO_BASE, team_id);
        let bytes = self
            .send(&url)
            .await?
            .bytes()
            .await
            .map_err(|source| DataError::Network { url: url.clone(), source })?;
        image::load_from_memory(&bytes).map_err(|source| DataError::Image { url, source })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> DataResult<T> {
        self.send(url)
            .await?
            .json::<T>()
            .await
            .map_err(|source| DataError::Parse { url: url.to_owned(), source })
    }

    async fn send(&self, url: &str) -> DataResult<reqwest::Response> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| DataError::Network { url: url.to_owned(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Status { url: url.to_owned(), status });
        }
        Ok(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let client = DataClient::new("https://statsapi.mlb.com/").unwrap();
        assert_eq!(
            client.schedule_url(11),
            "https://statsapi.mlb.com/api/v1/schedule?sportId=11"
        );
        assert_eq!(
            client.live_feed_url(717465),
            "https://statsapi.mlb.com/api/v1.1/game/717465/feed/live"
        );
    }
}
