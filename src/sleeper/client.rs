//! Read-only client for the public Sleeper REST API

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::models::Draft;
use super::models::DraftPick;
use super::models::League;
use super::models::LeagueMatchup;
use super::models::LeagueUser;
use super::models::Player;
use super::models::Roster;
use super::models::SleeperUser;
use super::models::TradedPick;
use super::models::Transaction;
use super::models::TrendKind;
use super::models::TrendingPlayer;
use crate::config::AppConfig;
use crate::embeddings::client::build_http_client;
use crate::embeddings::client::check_status;
use crate::errors::ProviderError;
use crate::errors::RagfantError;
use crate::retry::RetryPolicy;
use crate::Result;

/// Source of league data. Lookups of unknown entities return `None` or an
/// empty collection rather than an error.
#[async_trait]
pub trait LeagueDataSource: Send + Sync {
    async fn user(&self, username: &str) -> Result<Option<SleeperUser>>;

    async fn user_leagues(&self, user_id: &str, season: &str) -> Result<Vec<League>>;

    async fn league(&self, league_id: &str) -> Result<Option<League>>;

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>>;

    async fn league_users(&self, league_id: &str) -> Result<Vec<LeagueUser>>;

    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<LeagueMatchup>>;

    async fn transactions(&self, league_id: &str, week: u32) -> Result<Vec<Transaction>>;

    async fn draft(&self, draft_id: &str) -> Result<Option<Draft>>;

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>>;

    async fn traded_picks(&self, league_id: &str) -> Result<Vec<TradedPick>>;

    /// Full NFL player catalogue keyed by player id
    async fn players(&self) -> Result<HashMap<String, Player>>;

    async fn trending(&self, kind: TrendKind, hours: u32, limit: u32)
        -> Result<Vec<TrendingPlayer>>;
}

pub struct SleeperApi {
    base_url: Url,
    client: Client,
    policy: RetryPolicy,
}

impl SleeperApi {
    pub const PROVIDER: &'static str = "sleeper";

    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&config.sleeper.base_url).map_err(|e| {
                RagfantError::Config(format!(
                    "sleeper.base_url '{}' is invalid: {e}",
                    config.sleeper.base_url
                ))
            })?,
            client: build_http_client(config.request_timeout())?,
            policy: RetryPolicy::from(&config.http),
        })
    }

    /// Endpoint URL under the base path. Each segment is percent-encoded, so
    /// an id can never address another resource.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        for segment in segments {
            if segment.is_empty() || *segment == "." || *segment == ".." {
                return Err(RagfantError::InvalidInput(format!(
                    "invalid Sleeper identifier '{segment}'"
                )));
            }
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RagfantError::Config(format!("sleeper.base_url '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET the endpoint and decode the body. 404 and a JSON `null` body both map to `None`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!("GET {}", url);

        let fetch = || async {
            let response = self
                .client
                .get(url.clone())
                .query(query)
                .send()
                .await
                .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            check_status(Self::PROVIDER, response)
                .await?
                .json::<Option<T>>()
                .await
                .map_err(|e| ProviderError::from_reqwest(Self::PROVIDER, &e))
        };

        self.policy
            .run(Self::PROVIDER, fetch)
            .await
            .map_err(|e| RagfantError::Sleeper(format!("GET {path}: {e}")))
    }

    async fn get_list<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>> {
        Ok(self.get_json(segments, &[]).await?.unwrap_or_default())
    }
}

#[async_trait]
impl LeagueDataSource for SleeperApi {
    async fn user(&self, username: &str) -> Result<Option<SleeperUser>> {
        self.get_json(&["user", username], &[]).await
    }

    async fn user_leagues(&self, user_id: &str, season: &str) -> Result<Vec<League>> {
        self.get_list(&["user", user_id, "leagues", "nfl", season])
            .await
    }

    async fn league(&self, league_id: &str) -> Result<Option<League>> {
        self.get_json(&["league", league_id], &[]).await
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>> {
        self.get_list(&["league", league_id, "rosters"]).await
    }

    async fn league_users(&self, league_id: &str) -> Result<Vec<LeagueUser>> {
        self.get_list(&["league", league_id, "users"]).await
    }

    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<LeagueMatchup>> {
        let week = week.to_string();
        self.get_list(&["league", league_id, "matchups", &week])
            .await
    }

    async fn transactions(&self, league_id: &str, week: u32) -> Result<Vec<Transaction>> {
        let week = week.to_string();
        self.get_list(&["league", league_id, "transactions", &week])
            .await
    }

    async fn draft(&self, draft_id: &str) -> Result<Option<Draft>> {
        self.get_json(&["draft", draft_id], &[]).await
    }

    async fn draft_picks(&self, draft_id: &str) -> Result<Vec<DraftPick>> {
        self.get_list(&["draft", draft_id, "picks"]).await
    }

    async fn traded_picks(&self, league_id: &str) -> Result<Vec<TradedPick>> {
        self.get_list(&["league", league_id, "traded_picks"])
            .await
    }

    async fn players(&self) -> Result<HashMap<String, Player>> {
        let mut players: HashMap<String, Player> = self
            .get_json(&["players", "nfl"], &[])
            .await?
            .unwrap_or_default();
        for (id, player) in &mut players {
            if player.player_id.is_empty() {
                player.player_id.clone_from(id);
            }
        }
        Ok(players)
    }

    async fn trending(
        &self,
        kind: TrendKind,
        hours: u32,
        limit: u32,
    ) -> Result<Vec<TrendingPlayer>> {
        let query = [
            ("lookback_hours", hours.to_string()),
            ("limit", limit.to_string()),
        ];
        Ok(self
            .get_json(&["players", "nfl", "trending", kind.as_str()], &query)
            .await?
            .unwrap_or_default())
    }
}
