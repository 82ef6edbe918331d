//! Leaderboard ordering.
//!
//! Entries are ordered by fantasy points (descending). Ties are broken by
//! display name (case-insensitive, then exact), then by player id. Player ids
//! are unique within a batch, so the order is total and does not depend on
//! the order rows arrived in.

use crate::models::{RankedEntry, ScoredRecord};
use std::cmp::{Ordering, Reverse};

/// Sort key implementing the documented ranking order
fn rank_key(scored: &ScoredRecord) -> (Reverse<rust_decimal::Decimal>, String, String, String) {
    let record = &scored.record;
    (
        Reverse(scored.fantasy_points),
        record.player_name.to_lowercase(),
        record.player_name.clone(),
        record.player_id.clone(),
    )
}

/// Compare two scored records in leaderboard order
pub fn rank_order(a: &ScoredRecord, b: &ScoredRecord) -> Ordering {
    rank_key(a).cmp(&rank_key(b))
}

/// Sort eligible records and assign dense 1-based ranks
pub fn rank(mut scored: Vec<ScoredRecord>) -> Vec<RankedEntry> {
    scored.sort_by_cached_key(rank_key);

    scored
        .into_iter()
        .enumerate()
        .map(|(index, scored)| RankedEntry { rank: (index + 1) as u32, scored })
        .collect()
}
