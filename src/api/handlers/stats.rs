/// Index statistics handler
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::types::ApiResponse;
use crate::api::types::IndexStatsResponse;

/// Get index stats
pub async fn index_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<IndexStatsResponse>>, ApiError> {
    info!("GET /api/index/stats");
    let rag = state.rag()?;
    let retriever = rag.retriever();
    let index = retriever.index();

    let positions = index
        .metadata()
        .position_counts()
        .into_iter()
        .map(|(position, count)| (position.to_string(), count))
        .collect();

    Ok(Json(ApiResponse::success(IndexStatsResponse {
        records: index.len(),
        dimension: index.vectors().dimension(),
        positions,
        embedding_model: retriever.embedding_service().model().to_string(),
    })))
}
