//! Stream creation and admin metadata handlers.

use super::require_token_shape;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::streams::StreamEnvelope;
use axum::Json;
use axum::extract::{Path, State};

/// POST /stream - create a new stream.
pub async fn create_stream(State(state): State<AppState>) -> ApiResult<Json<StreamEnvelope>> {
    let stream = state.registry.create().await?;
    Ok(Json(state.registry.envelope(&stream)))
}

/// GET /{adminID}/admin - fetch a stream's URL envelope by admin token.
pub async fn fetch_stream(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
) -> ApiResult<Json<StreamEnvelope>> {
    require_token_shape(&state, &admin_id)?;
    let stream = state.registry.fetch(&admin_id).await?;
    Ok(Json(state.registry.envelope(&stream)))
}
