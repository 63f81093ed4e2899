//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Retrieval and answers
        .route("/search", post(handlers::search))
        .route("/ask", post(handlers::ask))
        .route("/index/stats", get(handlers::index_stats))
        // Sleeper league data
        .route(
            "/sleeper/users/:username/leagues",
            get(handlers::user_leagues),
        )
        .route(
            "/sleeper/users/:username/leagues/:league_id/roster",
            get(handlers::user_roster),
        )
        .route(
            "/sleeper/leagues/:league_id/keepers/:user_id",
            get(handlers::keepers),
        )
        .route(
            "/sleeper/leagues/:league_id/standings",
            get(handlers::standings),
        )
        .route(
            "/sleeper/leagues/:league_id/traded-picks",
            get(handlers::traded_picks),
        )
        .route(
            "/sleeper/leagues/:league_id/matchups/:week",
            get(handlers::matchups),
        )
        .route(
            "/sleeper/leagues/:league_id/transactions/:week",
            get(handlers::transactions),
        )
        .route("/sleeper/trending", get(handlers::trending))
        .with_state(state)
}
