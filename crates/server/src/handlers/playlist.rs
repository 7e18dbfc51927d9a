//! Playlist window handlers.

use super::require_token_shape;
use crate::error::{ApiError, ApiResult};
use crate::playlist::{SegmentEntry, WindowStart};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use silt_core::token::is_segment_id;

/// Query parameters for playlist reads.
#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    /// Window policy: `start` (default), `latest` or `random`.
    pub start: Option<String>,
}

/// GET /{publicID} - playlist window from a start policy.
pub async fn playlist(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Query(query): Query<PlaylistQuery>,
) -> ApiResult<Json<Vec<SegmentEntry>>> {
    require_token_shape(&state, &public_id)?;
    let start = WindowStart::parse(query.start.as_deref())?;

    let window = state.segment_log.select_window(&public_id, None, start).await?;
    Ok(Json(window))
}

/// GET /{publicID}/{segmentID} - playlist window after a cursor segment.
pub async fn playlist_after(
    State(state): State<AppState>,
    Path((public_id, segment_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<SegmentEntry>>> {
    require_token_shape(&state, &public_id)?;
    if !is_segment_id(&segment_id) {
        return Err(ApiError::BadRequest("invalid segment cursor".to_string()));
    }

    let window = state
        .segment_log
        .select_window(&public_id, Some(&segment_id), WindowStart::Start)
        .await?;
    Ok(Json(window))
}
