//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Slack on top of the configured segment ceiling for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Append permissive cross-origin headers to every response. Playback
/// clients fetch playlist data cross-origin from a separate static host.
async fn apply_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Origin, X-Requested-With, Content-Type, Accept, Range"),
    );
    response
}

/// Create the application router.
///
/// Path tokens are only shape-checked here and in the handlers; whether a
/// token resolves to a stream is the store's business. Unknown methods and
/// paths answer 400, OPTIONS answers an empty 200.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_segment_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/stream",
            post(handlers::create_stream).fallback(handlers::method_fallback),
        )
        .route(
            "/{token}",
            post(handlers::upload_segment)
                .get(handlers::playlist)
                .fallback(handlers::method_fallback),
        )
        .route(
            "/{token}/admin",
            get(handlers::fetch_stream)
                .put(handlers::register_hub)
                .delete(handlers::deregister_hub)
                .fallback(handlers::method_fallback),
        )
        .route(
            "/{token}/hubs",
            get(handlers::list_hubs).fallback(handlers::method_fallback),
        )
        .route(
            "/{token}/{segment}",
            get(handlers::playlist_after).fallback(handlers::method_fallback),
        )
        .fallback(handlers::unknown_path)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(map_response(apply_cors))
        .with_state(state)
}
