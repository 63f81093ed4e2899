//! Sleeper league handlers

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::RosterResponse;
use crate::api::types::TrendingQuery;
use crate::sleeper::league::roster_context;
use crate::sleeper::models::KeeperOption;
use crate::sleeper::models::LeagueMatchup;
use crate::sleeper::models::StandingRow;
use crate::sleeper::models::TradedPick;
use crate::sleeper::models::Transaction;
use crate::sleeper::models::Trending;
use crate::sleeper::models::UserLeagues;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub async fn user_leagues(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<UserLeagues> {
    info!("GET /api/sleeper/users/{}/leagues", username);
    let leagues = state.league.user_leagues(&username).await?;
    Ok(Json(ApiResponse::success(leagues)))
}

pub async fn user_roster(
    State(state): State<AppState>,
    Path((username, league_id)): Path<(String, String)>,
) -> ApiResult<RosterResponse> {
    info!("GET /api/sleeper/users/{}/leagues/{}/roster", username, league_id);
    let players = state.league.league_roster(&username, &league_id).await?;
    let context = roster_context(&players);
    Ok(Json(ApiResponse::success(RosterResponse { players, context })))
}

pub async fn keepers(
    State(state): State<AppState>,
    Path((league_id, user_id)): Path<(String, String)>,
) -> ApiResult<Vec<KeeperOption>> {
    info!("GET /api/sleeper/leagues/{}/keepers/{}", league_id, user_id);
    let options = state
        .league
        .keeper_recommendations(&league_id, &user_id)
        .await?;
    Ok(Json(ApiResponse::success(options)))
}

pub async fn standings(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
) -> ApiResult<Vec<StandingRow>> {
    info!("GET /api/sleeper/leagues/{}/standings", league_id);
    let rows = state.league.standings(&league_id).await?;
    Ok(Json(ApiResponse::success(rows)))
}

pub async fn traded_picks(
    State(state): State<AppState>,
    Path(league_id): Path<String>,
) -> ApiResult<Vec<TradedPick>> {
    info!("GET /api/sleeper/leagues/{}/traded-picks", league_id);
    let picks = state.league.traded_picks(&league_id).await?;
    Ok(Json(ApiResponse::success(picks)))
}

pub async fn matchups(
    State(state): State<AppState>,
    Path((league_id, week)): Path<(String, u32)>,
) -> ApiResult<Vec<LeagueMatchup>> {
    info!("GET /api/sleeper/leagues/{}/matchups/{}", league_id, week);
    let matchups = state.league.matchups(&league_id, week).await?;
    Ok(Json(ApiResponse::success(matchups)))
}

pub async fn transactions(
    State(state): State<AppState>,
    Path((league_id, week)): Path<(String, u32)>,
) -> ApiResult<Vec<Transaction>> {
    info!("GET /api/sleeper/leagues/{}/transactions/{}", league_id, week);
    let transactions = state.league.transactions(&league_id, week).await?;
    Ok(Json(ApiResponse::success(transactions)))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingQuery>,
) -> ApiResult<Trending> {
    info!(
        "GET /api/sleeper/trending (hours={}, limit={})",
        params.hours, params.limit
    );
    let trending = state.league.trending(params.hours, params.limit).await?;
    Ok(Json(ApiResponse::success(trending)))
}
