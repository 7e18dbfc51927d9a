//! Core types shared across the silt crates.
//!
//! This crate provides:
//! - Opaque capability tokens (generation, format validation)
//! - Segment sequence identifiers
//! - Configuration types

pub mod config;
pub mod error;
pub mod token;

pub use error::{Error, Result};
pub use token::TokenMinter;

/// Maximum number of segments returned by any playlist window query.
pub const PLAYLIST_WINDOW: usize = 10;
