//! Retrieval and question answering handlers

use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::AskRequest;
use crate::api::types::AskResponse;
use crate::api::types::SearchHit;
use crate::api::types::SearchRequest;
use crate::api::types::SearchResponse;
use crate::rag::RagQuery;

/// Semantic search over the player index, no generation
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    info!("POST /api/search: {}", req.query);
    req.validate()?;
    let rag = state.rag()?;
    let filters = req.filters.to_filters()?;
    let top_k = req.top_k.unwrap_or(rag.retriever().config().top_k);

    let outcome = rag.search(&req.query, top_k, &filters).await?;
    let results: Vec<SearchHit> = outcome.results.iter().map(SearchHit::from).collect();

    Ok(Json(ApiResponse::success(SearchResponse {
        query: req.query,
        intents: outcome.intents,
        count: results.len(),
        results,
    })))
}

/// Answer a question, optionally with the asker's Sleeper roster as context
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<ApiResponse<AskResponse>>, ApiError> {
    info!("POST /api/ask: {}", req.question);
    req.validate()?;
    let rag = state.rag()?;

    let mut extra_context = Vec::new();
    if let (Some(username), Some(league_id)) = (&req.sleeper_username, &req.league_id) {
        let roster = state
            .league
            .league_roster_context(username, league_id)
            .await?;
        extra_context.push(roster);
    }

    let query = RagQuery {
        filters: req.filters.to_filters()?,
        question: req.question,
        top_k: req.top_k,
        extra_context,
        temperature: req.temperature,
        max_tokens: req.max_tokens,
    };

    let outcome = rag.ask(query).await?;
    Ok(Json(ApiResponse::success(AskResponse::from(outcome))))
}
