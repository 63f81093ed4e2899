//! HTTP server implementation

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::Result;

/// Assemble the application: routes under `/api` plus tracing, compression and optional CORS
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting ragfant API server...");

    let state = AppState::from_config(config)?;
    let index_loaded = state.rag.is_some();
    let app = build_app(state, enable_cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("📋 RESTful API available at http://{}/api", addr);
    if !index_loaded {
        info!("⚠️  No index loaded, /api/search and /api/ask will answer 503");
    }
    info!("");
    info!("Available endpoints:");
    info!("  GET  /api/health                                      - Health check");
    info!("  POST /api/search                                      - Semantic player search");
    info!("  POST /api/ask                                         - RAG question");
    info!("  GET  /api/index/stats                                 - Index statistics");
    info!("  GET  /api/sleeper/users/:username/leagues             - User leagues");
    info!("  GET  /api/sleeper/users/:username/leagues/:id/roster  - User roster");
    info!("  GET  /api/sleeper/leagues/:id/keepers/:user_id        - Keeper values");
    info!("  GET  /api/sleeper/leagues/:id/standings               - Standings");
    info!("  GET  /api/sleeper/leagues/:id/traded-picks            - Traded picks");
    info!("  GET  /api/sleeper/leagues/:id/matchups/:week          - Weekly matchups");
    info!("  GET  /api/sleeper/leagues/:id/transactions/:week      - Weekly transactions");
    info!("  GET  /api/sleeper/trending                            - Trending adds and drops");
    info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
