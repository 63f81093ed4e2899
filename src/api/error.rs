//! Mapping from domain errors to HTTP responses

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;
use tracing::warn;

use crate::api::types::ApiResponse;
use crate::errors::RagfantError;

/// Handler error, rendered as an [`ApiResponse`] with `success: false`
#[derive(Debug)]
pub struct ApiError(pub RagfantError);

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match &self.0 {
            RagfantError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RagfantError::NotFound(_) => StatusCode::NOT_FOUND,
            RagfantError::Provider(_) | RagfantError::Sleeper(_) => StatusCode::BAD_GATEWAY,
            RagfantError::DataNotFound { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RagfantError> for ApiError {
    fn from(err: RagfantError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}
