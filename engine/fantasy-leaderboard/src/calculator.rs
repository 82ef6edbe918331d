use crate::models::{ScoredRecord, StatField, StatRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Multiplier applied to each counting stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub points: Decimal,
    pub rebounds: Decimal,
    pub assists: Decimal,
    pub steals: Decimal,
    pub blocks: Decimal,
    /// Negative: turnovers cost points
    pub turnovers: Decimal,
}

/// The league scoring table.
///
/// `FPts = PTS + 1.2*REB + 1.5*AST + 3*STL + 3*BLK - TOV`
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    points: Decimal::from_parts(1, 0, 0, false, 0),
    rebounds: Decimal::from_parts(12, 0, 0, false, 1),
    assists: Decimal::from_parts(15, 0, 0, false, 1),
    steals: Decimal::from_parts(3, 0, 0, false, 0),
    blocks: Decimal::from_parts(3, 0, 0, false, 0),
    turnovers: Decimal::from_parts(1, 0, 0, true, 0),
};

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl ScoringWeights {
    /// Weight for a counting stat
    pub fn weight(&self, field: StatField) -> Decimal {
        match field {
            StatField::Points => self.points,
            StatField::Rebounds => self.rebounds,
            StatField::Assists => self.assists,
            StatField::Steals => self.steals,
            StatField::Blocks => self.blocks,
            StatField::Turnovers => self.turnovers,
        }
    }
}

/// Applies the scoring table to stat records
#[derive(Debug, Clone)]
pub struct FantasyScorer {
    weights: ScoringWeights,
}

impl FantasyScorer {
    /// Create a scorer for the given weight table
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Fantasy points for one stat line; depends on counting stats only
    pub fn fantasy_points(&self, record: &StatRecord) -> Decimal {
        StatField::ALL
            .iter()
            .map(|&field| Decimal::from(record.stat(field)) * self.weights.weight(field))
            .sum::<Decimal>()
            .normalize()
    }

    /// Score a record, keeping the original line alongside the result
    pub fn score(&self, record: StatRecord) -> ScoredRecord {
        let fantasy_points = self.fantasy_points(&record);
        debug!(
            "Scored {} ({}): {} FPts",
            record.player_name, record.player_id, fantasy_points
        );
        ScoredRecord { record, fantasy_points }
    }

    /// Score every record of a batch, preserving order
    pub fn score_all(&self, records: Vec<StatRecord>) -> Vec<ScoredRecord> {
        records.into_iter().map(|record| self.score(record)).collect()
    }
}

impl Default for FantasyScorer {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTS)
    }
}

#[cfg(test)]
pub(crate) fn stat_line(
    player_id: &str,
    name: &str,
    [points, rebounds, assists, steals, blocks, turnovers]: [u32; 6],
    minutes: f64,
) -> StatRecord {
    StatRecord {
        player_id: player_id.to_string(),
        player_name: name.to_string(),
        team: "GSW".to_string(),
        points,
        rebounds,
        assists,
        steals,
        blocks,
        turnovers,
        minutes,
    }
}
