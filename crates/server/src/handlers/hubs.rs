//! Hub federation handlers.

use super::require_token_shape;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

/// PUT /{adminID}/admin - register a hub; the hub URL is the request body.
pub async fn register_hub(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    body: String,
) -> ApiResult<StatusCode> {
    require_token_shape(&state, &admin_id)?;

    let hub_url = body.trim();
    if hub_url.is_empty() {
        return Err(ApiError::BadRequest("no hub URL in body".to_string()));
    }
    let hub_url = reqwest::Url::parse(hub_url)
        .map_err(|e| ApiError::BadRequest(format!("invalid hub URL: {e}")))?;

    state.federation.register(hub_url.as_str(), &admin_id).await?;
    Ok(StatusCode::OK)
}

/// DELETE /{adminID}/admin - deregister a hub; the hub id is the request
/// body.
pub async fn deregister_hub(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    body: String,
) -> ApiResult<StatusCode> {
    require_token_shape(&state, &admin_id)?;

    let hub_id = body.trim();
    if hub_id.is_empty() {
        return Err(ApiError::BadRequest("no hub id in body".to_string()));
    }

    state.federation.deregister(hub_id, &admin_id).await?;
    Ok(StatusCode::OK)
}

/// GET /{adminID}/hubs - list the hub URLs registered for a stream.
pub async fn list_hubs(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    require_token_shape(&state, &admin_id)?;
    let hubs = state.federation.list(&admin_id).await?;
    Ok(Json(hubs))
}
