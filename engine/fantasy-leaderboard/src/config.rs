//! Configuration for the leaderboard engine

use crate::calculator::{ScoringWeights, DEFAULT_WEIGHTS};
use crate::error::LeaderboardError;
use crate::models::StatField;
use crate::{
    DEFAULT_COMMENTARY_TIMEOUT_MS, DEFAULT_ELITE_BAND_SIZE, DEFAULT_MIN_MINUTES,
    DEFAULT_SHAME_BAND_SIZE,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the leaderboard engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Fantasy scoring weights
    pub scoring: ScoringWeights,

    /// Minutes-played eligibility rule
    pub eligibility: EligibilityConfig,

    /// Tier band sizes
    pub tiers: TierConfig,

    /// Raw row handling
    pub normalization: NormalizationConfig,

    /// Commentary boundary settings
    pub commentary: CommentaryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Players must log strictly more than this many minutes
    pub min_minutes_exclusive: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    /// Number of entries directly below the apex in the elite band
    pub elite_band_size: usize,

    /// Number of lowest-ranked entries in the shame band
    pub shame_band_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Counting stats the batch source may omit (missing => 0)
    pub optional_fields: Vec<StatField>,

    /// What to do with rows that fail normalization
    pub malformed_policy: MalformedPolicy,
}

/// Handling of malformed rows within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the row, record it as rejected and keep going
    Skip,
    /// Fail the whole batch
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    /// Call the commentary provider at all
    pub enabled: bool,

    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            scoring: DEFAULT_WEIGHTS,
            eligibility: EligibilityConfig::default(),
            tiers: TierConfig::default(),
            normalization: NormalizationConfig::default(),
            commentary: CommentaryConfig::default(),
        }
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self { min_minutes_exclusive: DEFAULT_MIN_MINUTES }
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self { elite_band_size: DEFAULT_ELITE_BAND_SIZE, shame_band_size: DEFAULT_SHAME_BAND_SIZE }
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self { optional_fields: Vec::new(), malformed_policy: MalformedPolicy::Skip }
    }
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self { enabled: true, timeout_ms: DEFAULT_COMMENTARY_TIMEOUT_MS }
    }
}

impl CommentaryConfig {
    /// Per-call timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl NormalizationConfig {
    /// Whether the batch source declared this counting stat optional
    pub fn is_optional(&self, field: StatField) -> bool {
        self.optional_fields.contains(&field)
    }
}

impl LeaderboardConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(min_minutes) = std::env::var("LEADERBOARD_MIN_MINUTES") {
            config.eligibility.min_minutes_exclusive =
                min_minutes.parse().context("LEADERBOARD_MIN_MINUTES must be a number")?;
        }

        if let Ok(elite) = std::env::var("LEADERBOARD_ELITE_BAND") {
            config.tiers.elite_band_size =
                elite.parse().context("LEADERBOARD_ELITE_BAND must be a count")?;
        }

        if let Ok(shame) = std::env::var("LEADERBOARD_SHAME_BAND") {
            config.tiers.shame_band_size =
                shame.parse().context("LEADERBOARD_SHAME_BAND must be a count")?;
        }

        if let Ok(strict) = std::env::var("LEADERBOARD_STRICT") {
            let strict: bool = strict.parse().context("LEADERBOARD_STRICT must be true/false")?;
            config.normalization.malformed_policy =
                if strict { MalformedPolicy::Strict } else { MalformedPolicy::Skip };
        }

        if let Ok(enabled) = std::env::var("LEADERBOARD_COMMENTARY_ENABLED") {
            config.commentary.enabled =
                enabled.parse().context("LEADERBOARD_COMMENTARY_ENABLED must be true/false")?;
        }

        if let Ok(timeout) = std::env::var("LEADERBOARD_COMMENTARY_TIMEOUT_MS") {
            config.commentary.timeout_ms =
                timeout.parse().context("LEADERBOARD_COMMENTARY_TIMEOUT_MS must be an integer")?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: LeaderboardConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to encode config")?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot honor
    pub fn validate(&self) -> Result<(), LeaderboardError> {
        let threshold = self.eligibility.min_minutes_exclusive;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(LeaderboardError::config(format!(
                "min_minutes_exclusive must be a finite, non-negative number (got {threshold})"
            )));
        }

        if self.commentary.timeout_ms == 0 {
            return Err(LeaderboardError::config("commentary timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}
