//! League analysis over a [`LeagueDataSource`]

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;
use tracing::info;

use super::client::LeagueDataSource;
use super::models::DraftInfo;
use super::models::DraftPick;
use super::models::KeeperOption;
use super::models::LeagueMatchup;
use super::models::LeagueSummary;
use super::models::Player;
use super::models::Roster;
use super::models::RosterPlayer;
use super::models::StandingRow;
use super::models::TradedPick;
use super::models::Transaction;
use super::models::TrendKind;
use super::models::Trending;
use super::models::TrendingEntry;
use super::models::UserLeagues;
use crate::errors::RagfantError;
use crate::Result;

/// Rounds in a standard draft, used to scale keeper value
pub const DRAFT_ROUNDS: u32 = 17;

/// Relative worth of keeping a player at each position
pub fn position_multiplier(position: Option<&str>) -> f64 {
    match position {
        Some("QB") => 1.0,
        Some("RB") => 1.2,
        Some("WR") => 1.1,
        Some("TE") => 0.9,
        Some("K") => 0.5,
        Some("DEF") => 0.5,
        _ => 1.0,
    }
}

/// Keeper cost: one round earlier than drafted, never before round 1
pub fn keeper_round(draft_round: u32) -> u32 {
    draft_round.saturating_sub(1).max(1)
}

/// Value of keeping a player at `keeper_round`; earlier rounds score higher
pub fn keeper_value(position: Option<&str>, keeper_round: u32) -> f64 {
    let round_value =
        (f64::from(DRAFT_ROUNDS + 1) - f64::from(keeper_round)) / f64::from(DRAFT_ROUNDS);
    position_multiplier(position) * round_value
}

pub struct LeagueManager {
    source: Arc<dyn LeagueDataSource>,
    seasons: Vec<String>,
    players: OnceCell<Arc<HashMap<String, Player>>>,
}

impl LeagueManager {
    pub fn new(source: Arc<dyn LeagueDataSource>, seasons: Vec<String>) -> Self {
        Self {
            source,
            seasons,
            players: OnceCell::new(),
        }
    }

    /// Player catalogue, fetched once per process
    async fn catalogue(&self) -> Result<Arc<HashMap<String, Player>>> {
        let players = self
            .players
            .get_or_try_init(|| async {
                let players = self.source.players().await?;
                info!("Loaded {} players from Sleeper catalogue", players.len());
                Ok::<_, RagfantError>(Arc::new(players))
            })
            .await?;
        Ok(Arc::clone(players))
    }

    /// Picks made by `user_id` in the league's draft, if the league has one
    async fn user_draft_picks(
        &self,
        draft_id: Option<&str>,
        user_id: &str,
    ) -> Result<Vec<DraftPick>> {
        let Some(draft_id) = draft_id else {
            return Ok(Vec::new());
        };
        let picks = self.source.draft_picks(draft_id).await?;
        Ok(picks
            .into_iter()
            .filter(|p| p.picked_by.as_deref() == Some(user_id))
            .collect())
    }

    /// Every league the user owns a roster in, across the configured seasons
    pub async fn user_leagues(&self, username: &str) -> Result<UserLeagues> {
        let user = self
            .source
            .user(username)
            .await?
            .ok_or_else(|| RagfantError::NotFound(format!("Sleeper user {username}")))?;
        let user_id = user.user_id;

        let mut leagues = Vec::new();
        for season in &self.seasons {
            for league in self.source.user_leagues(&user_id, season).await? {
                let rosters = self.source.rosters(&league.league_id).await?;
                let total_rosters = rosters.len();
                let Some(user_roster) = rosters.into_iter().find(|r| r.is_owned_by(&user_id)) else {
                    debug!("No roster for {} in league {}", user_id, league.league_id);
                    continue;
                };

                let draft = match league.draft_id.as_deref() {
                    Some(draft_id) => self.source.draft(draft_id).await?,
                    None => None,
                };
                let draft_picks = self
                    .user_draft_picks(league.draft_id.as_deref(), &user_id)
                    .await?;

                leagues.push(LeagueSummary {
                    season: season.clone(),
                    league_name: league.name,
                    league_id: league.league_id,
                    total_rosters,
                    scoring_settings: league.scoring_settings,
                    roster_positions: league.roster_positions,
                    user_roster,
                    draft_picks,
                    draft,
                });
            }
        }

        info!("Found {} leagues for {}", leagues.len(), username);
        Ok(UserLeagues {
            username: username.to_string(),
            user_id,
            leagues,
        })
    }

    /// Resolve roster player ids against the catalogue, attaching draft
    /// round and pick when the player appears in `draft_picks`
    pub async fn roster_players(
        &self,
        roster: &Roster,
        draft_picks: &[DraftPick],
    ) -> Result<Vec<RosterPlayer>> {
        let catalogue = self.catalogue().await?;
        Ok(roster
            .player_ids()
            .iter()
            .filter_map(|id| {
                let player = catalogue.get(id)?;
                let draft_info = draft_picks
                    .iter()
                    .find(|pick| &pick.player_id == id)
                    .map(|pick| DraftInfo {
                        round: pick.round,
                        pick: pick.pick_no,
                    });
                Some(RosterPlayer {
                    player_id: id.clone(),
                    full_name: player.display_name(),
                    position: player.position.clone(),
                    team: player.team.clone(),
                    status: player.status.clone(),
                    injury_status: player.injury_status.clone(),
                    draft_info,
                })
            })
            .collect())
    }

    /// Drafted roster players ranked by keeper value, best first
    pub async fn keeper_recommendations(
        &self,
        league_id: &str,
        user_id: &str,
    ) -> Result<Vec<KeeperOption>> {
        let rosters = self.source.rosters(league_id).await?;
        let Some(roster) = rosters.into_iter().find(|r| r.is_owned_by(user_id)) else {
            return Ok(Vec::new());
        };

        let draft_id = self
            .source
            .league(league_id)
            .await?
            .and_then(|league| league.draft_id);
        let picks = self.user_draft_picks(draft_id.as_deref(), user_id).await?;
        let players = self.roster_players(&roster, &picks).await?;

        Ok(rank_keepers(players))
    }

    /// Wins, losses and points per roster, sorted by wins then points for
    pub async fn standings(&self, league_id: &str) -> Result<Vec<StandingRow>> {
        let rosters = self.source.rosters(league_id).await?;
        let users: HashMap<String, _> = self
            .source
            .league_users(league_id)
            .await?
            .into_iter()
            .map(|u| (u.user_id.clone(), u))
            .collect();

        let mut standings: Vec<StandingRow> = rosters
            .into_iter()
            .map(|roster| {
                let user = roster.owner_id.as_ref().and_then(|id| users.get(id));
                StandingRow {
                    roster_id: roster.roster_id,
                    username: user.and_then(|u| u.display_name.clone()),
                    team_name: user.and_then(super::models::LeagueUser::team_name),
                    user_id: roster.owner_id,
                    wins: roster.settings.wins,
                    losses: roster.settings.losses,
                    points_for: roster.settings.points_for(),
                    points_against: roster.settings.points_against(),
                }
            })
            .collect();

        standings.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.points_for.total_cmp(&a.points_for))
        });
        Ok(standings)
    }

    pub async fn traded_picks(&self, league_id: &str) -> Result<Vec<TradedPick>> {
        self.source.traded_picks(league_id).await
    }

    pub async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<LeagueMatchup>> {
        self.source.matchups(league_id, week).await
    }

    pub async fn transactions(&self, league_id: &str, week: u32) -> Result<Vec<Transaction>> {
        self.source.transactions(league_id, week).await
    }

    /// Most added and dropped players over the last `hours`
    pub async fn trending(&self, hours: u32, limit: u32) -> Result<Trending> {
        let adds = self.source.trending(TrendKind::Add, hours, limit).await?;
        let drops = self.source.trending(TrendKind::Drop, hours, limit).await?;
        let catalogue = self.catalogue().await?;

        let resolve = |entries: Vec<super::models::TrendingPlayer>| {
            entries
                .into_iter()
                .map(|e| TrendingEntry {
                    full_name: catalogue.get(&e.player_id).and_then(Player::display_name),
                    player_id: e.player_id,
                    count: e.count,
                })
                .collect::<Vec<_>>()
        };

        Ok(Trending {
            adds: resolve(adds),
            drops: resolve(drops),
        })
    }

    /// The user's roster in one league, with draft rounds attached
    pub async fn league_roster(&self, username: &str, league_id: &str) -> Result<Vec<RosterPlayer>> {
        let leagues = self.user_leagues(username).await?;
        let league = leagues
            .leagues
            .iter()
            .find(|l| l.league_id == league_id)
            .ok_or_else(|| {
                RagfantError::NotFound(format!("league {league_id} for Sleeper user {username}"))
            })?;
        self.roster_players(&league.user_roster, &league.draft_picks)
            .await
    }

    /// [`Self::league_roster`] rendered as prompt context
    pub async fn league_roster_context(&self, username: &str, league_id: &str) -> Result<String> {
        let players = self.league_roster(username, league_id).await?;
        Ok(roster_context(&players))
    }
}

/// Keeper options for drafted players, sorted by value descending
pub fn rank_keepers(players: Vec<RosterPlayer>) -> Vec<KeeperOption> {
    let mut options: Vec<KeeperOption> = players
        .into_iter()
        .filter_map(|player| {
            let original_round = player.draft_info?.round;
            let keeper_round = keeper_round(original_round);
            let value_score = keeper_value(player.position.as_deref(), keeper_round);
            Some(KeeperOption {
                player,
                original_round,
                keeper_round,
                value_score,
            })
        })
        .collect();
    options.sort_by(|a, b| b.value_score.total_cmp(&a.value_score));
    options
}

/// Render roster players as the context block appended to a question
pub fn roster_context(players: &[RosterPlayer]) -> String {
    let mut context = String::from("Your roster and draft positions:");
    for player in players {
        let _ = write!(
            context,
            "\n- {} ({} - {})",
            player.full_name.as_deref().unwrap_or("Unknown"),
            player.position.as_deref().unwrap_or("N/A"),
            player.team.as_deref().unwrap_or("FA"),
        );
        if let Some(info) = player.draft_info {
            let _ = write!(context, " [Drafted: Round {}, Pick {}]", info.round, info.pick);
        }
    }
    context
}
