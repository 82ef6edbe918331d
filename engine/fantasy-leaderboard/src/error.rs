//! Error types for the leaderboard engine

use thiserror::Error;

/// Result type for leaderboard operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;

/// Errors that can occur while turning a raw batch into a leaderboard
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LeaderboardError {
    /// A raw row could not be normalized into a stat record
    #[error("Malformed record at row {index} (player {player_id:?}): {reason}")]
    MalformedRecord { index: usize, player_id: Option<String>, reason: String },

    /// A second row carried a player id already seen in this batch
    #[error("Duplicate player {player_id} at row {index}")]
    DuplicatePlayer { index: usize, player_id: String },

    /// Strict mode refused a batch containing malformed rows
    #[error("Batch rejected in strict mode: {rejected} malformed row(s), first: {first}")]
    StrictBatchRejected { rejected: usize, first: Box<LeaderboardError> },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LeaderboardError {
    /// Create a malformed-record error
    pub fn malformed(index: usize, player_id: Option<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord { index, player_id, reason: reason.into() }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Row index the error refers to, if any
    pub fn row_index(&self) -> Option<usize> {
        match self {
            Self::MalformedRecord { index, .. } | Self::DuplicatePlayer { index, .. } => {
                Some(*index)
            }
            Self::StrictBatchRejected { first, .. } => first.row_index(),
            Self::Config(_) => None,
        }
    }
}
