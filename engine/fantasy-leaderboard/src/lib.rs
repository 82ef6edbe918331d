//! # Fantasy Leaderboard
//!
//! Turns one day's basketball box scores into a fantasy leaderboard: raw rows
//! are normalized, garbage-time appearances dropped, every line scored with a
//! fixed weight table, ranked with a deterministic tie-break and sliced into
//! an apex, an elite band and a shame band. Commentary for the extremes is
//! fetched on demand from an external text-generation provider and never
//! blocks the numeric leaderboard.

pub mod calculator;
pub mod commentary;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod ranker;
pub mod tiers;

#[cfg(test)]
mod tests;

pub use calculator::{FantasyScorer, ScoringWeights, DEFAULT_WEIGHTS};
pub use commentary::{
    attach_response, build_request, AnnotatedEntry, Commentary, CommentaryAttacher,
    CommentaryError, CommentaryProvider, CommentaryRequest, CommentaryTier, ExtremesCommentary,
    UnavailableReason, COMMENTARY_UNAVAILABLE,
};
pub use config::{LeaderboardConfig, MalformedPolicy, TierConfig};
pub use engine::LeaderboardEngine;
pub use error::{LeaderboardError, Result};
pub use models::*;

/// Players must log strictly more than this many minutes to be ranked
pub const DEFAULT_MIN_MINUTES: f64 = 10.0;

/// Entries directly below the apex in the elite band
pub const DEFAULT_ELITE_BAND_SIZE: usize = 8;

/// Lowest-ranked entries in the shame band
pub const DEFAULT_SHAME_BAND_SIZE: usize = 8;

/// Per-call commentary timeout
pub const DEFAULT_COMMENTARY_TIMEOUT_MS: u64 = 8_000;
