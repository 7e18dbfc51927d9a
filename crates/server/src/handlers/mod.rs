//! HTTP request handlers.

pub mod hubs;
pub mod playlist;
pub mod streams;
pub mod uploads;

pub use hubs::{deregister_hub, list_hubs, register_hub};
pub use playlist::{playlist, playlist_after};
pub use streams::{create_stream, fetch_stream};
pub use uploads::upload_segment;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

/// Reject a path token that does not have the configured token shape,
/// before any store access happens.
pub(crate) fn require_token_shape(state: &AppState, candidate: &str) -> ApiResult<()> {
    if state.tokens.validate(candidate) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("invalid path".to_string()))
    }
}

/// Method fallback on known paths: OPTIONS preflights get an empty 200,
/// anything else is not a valid request.
pub async fn method_fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        ApiError::BadRequest("this is not a valid request".to_string()).into_response()
    }
}

/// Router fallback for paths outside the route table.
pub async fn unknown_path(method: Method) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        ApiError::BadRequest("invalid path".to_string()).into_response()
    }
}
