//! Tier partitioning.
//!
//! The apex is rank 1. The elite band is the next `elite_band_size` ranks.
//! The shame band is the bottom `shame_band_size` ranks drawn only from what
//! is left after the apex and elite band, so on small batches it shrinks
//! instead of repeating elite players. Shame is shown worst first: ascending
//! fantasy points, ties by rank descending (the primary tie-break reversed).

use crate::config::TierConfig;
use crate::models::{RankedEntry, Tiers};
use std::cmp::Reverse;

/// Slice a ranked list into apex, elite and shame bands
pub fn partition(ranked: &[RankedEntry], config: &TierConfig) -> Tiers {
    let Some((apex, rest)) = ranked.split_first() else {
        return Tiers::default();
    };

    let elite_len = config.elite_band_size.min(rest.len());
    let (elite, remainder) = rest.split_at(elite_len);

    let shame_len = config.shame_band_size.min(remainder.len());
    let mut shame = remainder[remainder.len() - shame_len..].to_vec();
    shame.sort_by_key(|entry| (entry.fantasy_points(), Reverse(entry.rank)));

    Tiers { apex: Some(apex.clone()), elite: elite.to_vec(), shame }
}
