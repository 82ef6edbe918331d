//! Commentary attachment.
//!
//! Turns apex and shame entries into prompt payloads for an external
//! text-generation provider and attaches whatever comes back. Commentary is
//! best-effort: failures and timeouts become an explicit unavailable marker
//! and never reach the caller as errors.

use crate::config::CommentaryConfig;
use crate::models::{Leaderboard, RankedEntry};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Marker shown in place of commentary text
pub const COMMENTARY_UNAVAILABLE: &str = "Commentary unavailable";

const PERSONA: &str = "You are a professional NBA fantasy basketball analyst writing short takes \
for a daily red list (best performers) and black list (worst performers). Keep it to two \
sentences and refer to the actual numbers.";

/// Which extreme of the leaderboard a request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentaryTier {
    Apex,
    Shame,
}

impl CommentaryTier {
    pub fn label(self) -> &'static str {
        match self {
            CommentaryTier::Apex => "apex",
            CommentaryTier::Shame => "shame",
        }
    }

    /// Tone the provider is asked to take
    pub fn tone_instruction(self) -> &'static str {
        match self {
            CommentaryTier::Apex => {
                "This player tops today's red list. Hype them up with encouraging, \
                 over-the-top praise."
            }
            CommentaryTier::Shame => {
                "This player landed on today's black list. Roast them with playful, \
                 mocking humor."
            }
        }
    }
}

impl fmt::Display for CommentaryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payload handed to a text-generation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryRequest {
    pub player_id: String,
    pub player_name: String,
    pub team: String,
    pub stat_summary: String,
    pub tier: CommentaryTier,
}

impl CommentaryRequest {
    /// Full prompt text: persona, tone and the player's line
    pub fn prompt(&self) -> String {
        format!(
            "{PERSONA}\n{}\nPlayer: {} ({})\nLine: {}",
            self.tier.tone_instruction(),
            self.player_name,
            self.team,
            self.stat_summary
        )
    }
}

/// Why a provider produced no commentary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentaryError {
    #[error("commentary request timed out")]
    Timeout,

    #[error("commentary provider error: {0}")]
    Provider(String),

    #[error("commentary provider returned no text")]
    EmptyResponse,
}

/// Reason attached alongside the unavailable marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    Timeout,
    ProviderError(String),
    EmptyResponse,
    Disabled,
}

impl From<CommentaryError> for UnavailableReason {
    fn from(err: CommentaryError) -> Self {
        match err {
            CommentaryError::Timeout => UnavailableReason::Timeout,
            CommentaryError::Provider(msg) => UnavailableReason::ProviderError(msg),
            CommentaryError::EmptyResponse => UnavailableReason::EmptyResponse,
        }
    }
}

/// Commentary attached to an entry for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commentary {
    Text(String),
    Unavailable(UnavailableReason),
}

impl Commentary {
    pub fn is_available(&self) -> bool {
        matches!(self, Commentary::Text(_))
    }

    /// Text to display: the commentary or the unavailable marker
    pub fn display_text(&self) -> &str {
        match self {
            Commentary::Text(text) => text,
            Commentary::Unavailable(_) => COMMENTARY_UNAVAILABLE,
        }
    }
}

/// A leaderboard entry with its commentary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedEntry {
    pub entry: RankedEntry,
    pub tier: CommentaryTier,
    pub commentary: Commentary,
}

/// Commentary for the extremes of one leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtremesCommentary {
    pub apex: Option<AnnotatedEntry>,
    /// Same order as the leaderboard's shame band
    pub shame: Vec<AnnotatedEntry>,
}

/// Compact stat line, e.g. "30 PTS, 8 REB, 5 AST, 2 STL, 0 BLK, 3 TOV in 34 MIN (50.1 FPts)"
pub fn stat_summary(entry: &RankedEntry) -> String {
    let r = entry.record();
    format!(
        "{} PTS, {} REB, {} AST, {} STL, {} BLK, {} TOV in {} MIN ({} FPts)",
        r.points,
        r.rebounds,
        r.assists,
        r.steals,
        r.blocks,
        r.turnovers,
        r.minutes,
        entry.fantasy_points().normalize()
    )
}

/// Build the provider payload for an entry; pure and deterministic
pub fn build_request(entry: &RankedEntry, tier: CommentaryTier) -> CommentaryRequest {
    let record = entry.record();
    CommentaryRequest {
        player_id: record.player_id.clone(),
        player_name: record.player_name.clone(),
        team: record.team.clone(),
        stat_summary: stat_summary(entry),
        tier,
    }
}

/// Attach a provider result to an entry; errors become the unavailable marker
pub fn attach_response(
    entry: &RankedEntry,
    tier: CommentaryTier,
    response: Result<String, CommentaryError>,
) -> AnnotatedEntry {
    let commentary = match response {
        Ok(text) if text.trim().is_empty() => {
            Commentary::Unavailable(UnavailableReason::EmptyResponse)
        }
        Ok(text) => Commentary::Text(text.trim().to_string()),
        Err(err) => {
            warn!("Commentary for {} ({}) unavailable: {}", entry.player_name(), tier, err);
            Commentary::Unavailable(err.into())
        }
    };

    AnnotatedEntry { entry: entry.clone(), tier, commentary }
}

/// External text-generation collaborator. One attempt per call, no retries.
#[async_trait::async_trait]
pub trait CommentaryProvider: Send + Sync {
    async fn generate(&self, request: &CommentaryRequest) -> Result<String, CommentaryError>;
}

/// Fetches commentary on demand, one bounded call per entry
#[derive(Clone)]
pub struct CommentaryAttacher {
    provider: Arc<dyn CommentaryProvider>,
    config: CommentaryConfig,
}

impl CommentaryAttacher {
    pub fn new(provider: Arc<dyn CommentaryProvider>, config: CommentaryConfig) -> Self {
        Self { provider, config }
    }

    /// Comment on a single entry
    pub async fn comment_on(&self, entry: &RankedEntry, tier: CommentaryTier) -> AnnotatedEntry {
        if !self.config.enabled {
            return AnnotatedEntry {
                entry: entry.clone(),
                tier,
                commentary: Commentary::Unavailable(UnavailableReason::Disabled),
            };
        }

        let request = build_request(entry, tier);
        debug!("Requesting {} commentary for {}", tier, request.player_name);

        let response =
            match tokio::time::timeout(self.config.timeout(), self.provider.generate(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(CommentaryError::Timeout),
            };

        attach_response(entry, tier, response)
    }

    /// Comment on the apex and every shame member; elite entries are never sent
    pub async fn annotate_extremes(&self, leaderboard: &Leaderboard) -> ExtremesCommentary {
        let apex = async {
            match leaderboard.apex() {
                Some(entry) => Some(self.comment_on(entry, CommentaryTier::Apex).await),
                None => None,
            }
        };
        let shame = join_all(
            leaderboard.shame().iter().map(|entry| self.comment_on(entry, CommentaryTier::Shame)),
        );

        let (apex, shame) = futures::join!(apex, shame);

        let available = apex.iter().chain(&shame).filter(|a| a.commentary.is_available()).count();
        info!(
            "Attached commentary to {} of {} extreme entries",
            available,
            apex.iter().count() + shame.len()
        );

        ExtremesCommentary { apex, shame }
    }
}
