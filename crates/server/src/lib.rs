//! silt server library.
//!
//! Exposes the application state and router so integration tests can drive
//! the HTTP surface without binding a socket.

pub mod background;
pub mod error;
pub mod federation;
pub mod handlers;
pub mod ingest;
pub mod playlist;
pub mod routes;
pub mod sequence;
pub mod state;
pub mod streams;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
