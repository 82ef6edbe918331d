use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    calculator::FantasyScorer,
    commentary::{CommentaryAttacher, CommentaryProvider},
    config::{LeaderboardConfig, MalformedPolicy},
    eligibility::EligibilityFilter,
    error::{LeaderboardError, Result},
    models::{Leaderboard, RawBatch, RawRow, RejectedRow, StatRecord},
    normalizer::RecordNormalizer,
    ranker, tiers,
};

/// Runs a raw batch through normalize → filter → score → rank → partition
#[derive(Debug, Clone)]
pub struct LeaderboardEngine {
    config: LeaderboardConfig,
    normalizer: RecordNormalizer,
    filter: EligibilityFilter,
    scorer: FantasyScorer,
}

impl LeaderboardEngine {
    /// Create an engine from an explicit configuration
    pub fn new(config: LeaderboardConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            normalizer: RecordNormalizer::new(config.normalization.clone()),
            filter: EligibilityFilter::new(config.eligibility.clone()),
            scorer: FantasyScorer::new(config.scoring),
            config,
        })
    }

    pub fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    pub fn scorer(&self) -> &FantasyScorer {
        &self.scorer
    }

    /// Build the leaderboard for one batch.
    ///
    /// Malformed rows are skipped and listed in `Leaderboard::rejected`, or
    /// fail the whole batch when the policy is strict. An empty batch is not
    /// an error.
    pub fn build(&self, batch: &RawBatch) -> Result<Leaderboard> {
        let (records, rejected) = self.normalize_rows(&batch.rows)?;
        let (eligible, ineligible) = self.filter.filter(records);
        let scored = self.scorer.score_all(eligible);
        let entries = ranker::rank(scored);
        let tiers = tiers::partition(&entries, &self.config.tiers);

        info!(
            "Built leaderboard: {} rows, {} rejected, {} ineligible, {} ranked",
            batch.rows.len(),
            rejected.len(),
            ineligible,
            entries.len()
        );
        if let Some(apex) = &tiers.apex {
            info!("Apex: {} ({}) with {} FPts", apex.player_name(), apex.record().team, apex.fantasy_points());
        }

        Ok(Leaderboard {
            game_date: batch.game_date,
            rows_received: batch.rows.len(),
            ineligible,
            rejected,
            entries,
            tiers,
        })
    }

    /// Build from bare rows with no date label
    pub fn build_from_rows(&self, rows: Vec<RawRow>) -> Result<Leaderboard> {
        self.build(&RawBatch::from_rows(rows))
    }

    /// Commentary attacher sharing this engine's commentary settings
    pub fn commentary_attacher(&self, provider: Arc<dyn CommentaryProvider>) -> CommentaryAttacher {
        CommentaryAttacher::new(provider, self.config.commentary.clone())
    }

    fn normalize_rows(&self, rows: &[RawRow]) -> Result<(Vec<StatRecord>, Vec<RejectedRow>)> {
        let mut records = Vec::with_capacity(rows.len());
        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();

        for (index, row) in rows.iter().enumerate() {
            let outcome = self.normalizer.normalize(index, row).and_then(|record| {
                if seen_ids.insert(record.player_id.clone()) {
                    Ok(record)
                } else {
                    Err(LeaderboardError::DuplicatePlayer { index, player_id: record.player_id })
                }
            });

            match outcome {
                Ok(record) => records.push(record),
                Err(err) => errors.push(err),
            }
        }

        if self.config.normalization.malformed_policy == MalformedPolicy::Strict {
            let rejected = errors.len();
            if let Some(first) = errors.into_iter().next() {
                return Err(LeaderboardError::StrictBatchRejected {
                    rejected,
                    first: Box::new(first),
                });
            }
            return Ok((records, Vec::new()));
        }

        let rejected = errors
            .into_iter()
            .map(|err| {
                warn!("Skipping row: {}", err);
                match err {
                    LeaderboardError::MalformedRecord { index, player_id, reason } => {
                        RejectedRow { index, player_id, reason }
                    }
                    LeaderboardError::DuplicatePlayer { index, player_id } => RejectedRow {
                        index,
                        player_id: Some(player_id),
                        reason: "duplicate player id in batch".to_string(),
                    },
                    other => RejectedRow {
                        index: other.row_index().unwrap_or_default(),
                        player_id: None,
                        reason: other.to_string(),
                    },
                }
            })
            .collect();

        Ok((records, rejected))
    }
}

impl Default for LeaderboardEngine {
    fn default() -> Self {
        let config = LeaderboardConfig::default();
        Self {
            normalizer: RecordNormalizer::new(config.normalization.clone()),
            filter: EligibilityFilter::new(config.eligibility.clone()),
            scorer: FantasyScorer::new(config.scoring),
            config,
        }
    }
}
