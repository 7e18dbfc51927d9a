//! Opaque capability tokens and segment sequence identifiers.
//!
//! Streams are addressed by two unrelated random tokens: a `publicID`
//! granting playlist reads and an `adminID` granting uploads and hub
//! management. Neither is derived from the other; both are minted from the
//! same configured alphabet and length.

use crate::config::TokenConfig;
use crate::error::{Error, Result};
use rand::Rng;

/// Width of the zero-padded decimal segment counter.
pub const SEGMENT_ID_WIDTH: usize = 8;

/// Mints and validates opaque stream tokens.
///
/// Generation draws from the thread-local CSPRNG; tokens are bearer
/// credentials, so a biased or predictable source is not acceptable here.
#[derive(Clone, Debug)]
pub struct TokenMinter {
    length: usize,
    alphabet: Vec<char>,
}

impl TokenMinter {
    /// Build a minter from configuration.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        if config.length == 0 {
            return Err(Error::Config("token length must be non-zero".to_string()));
        }

        let mut alphabet: Vec<char> = config.alphabet.chars().collect();
        alphabet.sort_unstable();
        alphabet.dedup();

        if alphabet.len() < 2 {
            return Err(Error::Config(format!(
                "token alphabet needs at least 2 distinct characters, got {}",
                alphabet.len()
            )));
        }

        Ok(Self {
            length: config.length,
            alphabet,
        })
    }

    /// Generate a fresh token.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Check whether a candidate string has the configured token shape.
    ///
    /// This is a format check only, not a lookup; the router uses it to
    /// reject malformed paths before touching the store.
    pub fn validate(&self, candidate: &str) -> bool {
        candidate.chars().count() == self.length
            && candidate.chars().all(|c| self.alphabet.binary_search(&c).is_ok())
    }

    /// Uniformly distributed integer over `[min, max_exclusive)`.
    ///
    /// Used for playlist-window offset selection; re-sampled on every call.
    /// An empty range yields `min`.
    pub fn uniform_random_int(&self, min: u64, max_exclusive: u64) -> u64 {
        if max_exclusive <= min {
            return min;
        }
        rand::rng().random_range(min..max_exclusive)
    }
}

/// Render a segment sequence number as a fixed-width zero-padded counter.
///
/// Counters past `10^SEGMENT_ID_WIDTH - 1` widen naturally; insertion order
/// in the store remains the authoritative playback order.
pub fn format_segment_id(sequence: u64) -> String {
    format!("{sequence:0width$}", width = SEGMENT_ID_WIDTH)
}

/// Check whether a candidate string has the segment-counter shape.
pub fn is_segment_id(candidate: &str) -> bool {
    candidate.len() >= SEGMENT_ID_WIDTH && candidate.bytes().all(|b| b.is_ascii_digit())
}
