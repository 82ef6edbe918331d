use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw player-game row as handed over by the stats provider
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// A day's (or batch's) worth of raw box-score rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBatch {
    /// Game date the rows belong to, if the source provides one
    #[serde(default)]
    pub game_date: Option<NaiveDate>,

    /// Raw rows in provider order
    #[serde(default)]
    pub rows: Vec<RawRow>,
}

impl RawBatch {
    /// Wrap a bare list of rows
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        Self { game_date: None, rows }
    }

    /// Attach a game date label
    pub fn with_game_date(mut self, game_date: NaiveDate) -> Self {
        self.game_date = Some(game_date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Counting stats that feed the scoring formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatField {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
}

impl StatField {
    pub const ALL: [StatField; 6] = [
        StatField::Points,
        StatField::Rebounds,
        StatField::Assists,
        StatField::Steals,
        StatField::Blocks,
        StatField::Turnovers,
    ];

    /// Canonical row key
    pub fn key(self) -> &'static str {
        match self {
            StatField::Points => "points",
            StatField::Rebounds => "rebounds",
            StatField::Assists => "assists",
            StatField::Steals => "steals",
            StatField::Blocks => "blocks",
            StatField::Turnovers => "turnovers",
        }
    }

    /// Keys accepted for this stat, canonical first (matched case-insensitively)
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            StatField::Points => &["points", "pts"],
            StatField::Rebounds => &["rebounds", "reb", "trb", "rebounds_total"],
            StatField::Assists => &["assists", "ast"],
            StatField::Steals => &["steals", "stl"],
            StatField::Blocks => &["blocks", "blk"],
            StatField::Turnovers => &["turnovers", "tov", "to"],
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One player's single-game statistical line, validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Provider player id, unique within a batch
    pub player_id: String,
    /// Display name (e.g., "Stephen Curry")
    pub player_name: String,
    /// Team abbreviation (e.g., "GSW")
    pub team: String,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    /// Minutes played; seconds are dropped when the source sends "MM:SS"
    pub minutes: f64,
}

impl StatRecord {
    /// Value of a counting stat
    pub fn stat(&self, field: StatField) -> u32 {
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

/// A stat record with its derived fantasy points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: StatRecord,
    pub fantasy_points: Decimal,
}

/// A scored record placed on the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based, dense, unique within the batch
    pub rank: u32,
    #[serde(flatten)]
    pub scored: ScoredRecord,
}

impl RankedEntry {
    pub fn record(&self) -> &StatRecord {
        &self.scored.record
    }

    pub fn player_id(&self) -> &str {
        &self.scored.record.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.scored.record.player_name
    }

    pub fn fantasy_points(&self) -> Decimal {
        self.scored.fantasy_points
    }

    /// Fantasy points as a float, for display
    pub fn fantasy_points_f64(&self) -> f64 {
        self.scored.fantasy_points.to_f64().unwrap_or(0.0)
    }
}

/// Tier a leaderboard entry falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Apex,
    Elite,
    Shame,
}

/// Tier assignments for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiers {
    /// Rank-1 entry
    pub apex: Option<RankedEntry>,
    /// Entries directly below the apex, rank order
    pub elite: Vec<RankedEntry>,
    /// Lowest-ranked entries, worst first
    pub shame: Vec<RankedEntry>,
}

/// A raw row that did not make it through normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// Position of the row in the raw batch
    pub index: usize,
    pub player_id: Option<String>,
    pub reason: String,
}

/// Ranked, tiered result for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub game_date: Option<NaiveDate>,
    /// Number of raw rows in the batch
    pub rows_received: usize,
    /// Rows dropped by the minutes threshold
    pub ineligible: usize,
    /// Rows dropped as malformed
    pub rejected: Vec<RejectedRow>,
    /// Every eligible entry in rank order
    pub entries: Vec<RankedEntry>,
    pub tiers: Tiers,
}

impl Leaderboard {
    pub fn apex(&self) -> Option<&RankedEntry> {
        self.tiers.apex.as_ref()
    }

    pub fn elite(&self) -> &[RankedEntry] {
        &self.tiers.elite
    }

    pub fn shame(&self) -> &[RankedEntry] {
        &self.tiers.shame
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up an entry by player id
    pub fn get(&self, player_id: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.player_id() == player_id)
    }

    /// Which tier, if any, a player landed in
    pub fn tier_of(&self, player_id: &str) -> Option<Tier> {
        if self.apex().is_some_and(|e| e.player_id() == player_id) {
            Some(Tier::Apex)
        } else if self.elite().iter().any(|e| e.player_id() == player_id) {
            Some(Tier::Elite)
        } else if self.shame().iter().any(|e| e.player_id() == player_id) {
            Some(Tier::Shame)
        } else {
            None
        }
    }
}
