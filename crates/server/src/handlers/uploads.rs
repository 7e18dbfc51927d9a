//! Segment upload handler.

use super::require_token_shape;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Multipart, Path, State};
use bytes::Bytes;

/// Multipart field the audio payload must arrive in.
const AUDIO_FIELD: &str = "audio";

/// POST /{adminID} - upload one audio segment.
///
/// The body must be multipart form data with exactly one `audio` file
/// field. Responds with the segment's public URL as plain text.
pub async fn upload_segment(
    State(state): State<AppState>,
    Path(admin_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<String> {
    require_token_shape(&state, &admin_id)?;

    let payload = extract_audio_field(multipart).await?;
    state.ingest.ingest(&admin_id, payload).await
}

/// Pull the single `audio` field out of the form, rejecting missing,
/// repeated or unreadable fields.
async fn extract_audio_field(mut multipart: Multipart) -> ApiResult<Bytes> {
    let mut payload: Option<Bytes> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ApiError::BadRequest(format!("unreadable form data: {e}")));
            }
        };

        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        if payload.is_some() {
            return Err(ApiError::BadRequest(format!(
                "more than one {AUDIO_FIELD} field in upload"
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("unreadable {AUDIO_FIELD} field: {e}")))?;
        payload = Some(data);
    }

    payload.ok_or_else(|| ApiError::BadRequest(format!("missing {AUDIO_FIELD} field in upload")))
}
