//! Raw row normalization for the leaderboard pipeline

use crate::config::NormalizationConfig;
use crate::error::{LeaderboardError, Result};
use crate::models::{RawRow, StatField, StatRecord};
use serde_json::Value;
use tracing::debug;

const PLAYER_ID_KEYS: &[&str] = &["player_id", "id", "personid"];
const PLAYER_NAME_KEYS: &[&str] = &["player_name", "name", "player", "display_name"];
const TEAM_KEYS: &[&str] = &["team", "team_abbreviation", "team_code", "teamtricode"];
const MINUTES_KEYS: &[&str] = &["minutes", "min", "mp"];

/// Separator between whole minutes and seconds in "MM:SS" values
pub const MINUTES_SEPARATOR: char = ':';

/// Turns raw provider rows into validated stat records
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    config: NormalizationConfig,
}

impl RecordNormalizer {
    pub fn new(config: NormalizationConfig) -> Self {
        Self { config }
    }

    /// Normalize one raw row; `index` is its position in the batch
    pub fn normalize(&self, index: usize, row: &RawRow) -> Result<StatRecord> {
        let player_id = read_player_id(row)
            .ok_or_else(|| LeaderboardError::malformed(index, None, "missing player id"))?;

        let malformed = |reason: String| {
            LeaderboardError::malformed(index, Some(player_id.clone()), reason)
        };

        let player_name = read_text(row, PLAYER_NAME_KEYS)
            .ok_or_else(|| malformed("missing player name".to_string()))?;
        let team = lookup(row, TEAM_KEYS)
            .and_then(text_value)
            .map(|team| team.to_uppercase())
            .ok_or_else(|| malformed("missing team code".to_string()))?;

        let mut stats = [0u32; 6];
        for (slot, field) in stats.iter_mut().zip(StatField::ALL) {
            *slot = self.read_stat(row, field).map_err(&malformed)?;
        }
        let [points, rebounds, assists, steals, blocks, turnovers] = stats;

        let minutes = lookup(row, MINUTES_KEYS).map(parse_minutes).unwrap_or(0.0);

        debug!("Normalized row {} into {} ({}), {:.0} min", index, player_name, player_id, minutes);

        Ok(StatRecord {
            player_id,
            player_name,
            team,
            points,
            rebounds,
            assists,
            steals,
            blocks,
            turnovers,
            minutes,
        })
    }

    fn read_stat(&self, row: &RawRow, field: StatField) -> std::result::Result<u32, String> {
        match lookup(row, field.aliases()) {
            None | Some(Value::Null) if self.config.is_optional(field) => Ok(0),
            None | Some(Value::Null) => Err(format!("missing required stat '{field}'")),
            Some(value) => coerce_count(value).map_err(|why| format!("'{field}' {why}")),
        }
    }
}

/// Case-insensitive lookup over a list of accepted keys
fn lookup<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| {
        row.get(*key).or_else(|| {
            row.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v)
        })
    })
}

fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn read_text(row: &RawRow, keys: &[&str]) -> Option<String> {
    lookup(row, keys).and_then(text_value)
}

fn read_player_id(row: &RawRow) -> Option<String> {
    read_text(row, PLAYER_ID_KEYS)
}

/// Coerce a counting stat to a non-negative integer.
///
/// Accepts JSON integers, whole-valued floats and digit strings. Negative,
/// fractional and non-numeric values are errors; nothing is clamped.
pub fn coerce_count(value: &Value) -> std::result::Result<u32, String> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).map_err(|_| format!("is out of range ({v})"))
            } else if let Some(v) = n.as_i64() {
                Err(format!("must be non-negative (got {v})"))
            } else {
                coerce_float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(v) = s.parse::<i64>() {
                if v < 0 {
                    return Err(format!("must be non-negative (got {v})"));
                }
                return u32::try_from(v).map_err(|_| format!("is out of range ({v})"));
            }
            match s.parse::<f64>() {
                Ok(v) => coerce_float(v),
                Err(_) => Err(format!("is not numeric ({s:?})")),
            }
        }
        other => Err(format!("is not numeric ({other})")),
    }
}

fn coerce_float(v: f64) -> std::result::Result<u32, String> {
    if !v.is_finite() {
        Err(format!("is not a finite number ({v})"))
    } else if v < 0.0 {
        Err(format!("must be non-negative (got {v})"))
    } else if v.fract() != 0.0 {
        Err(format!("must be a whole number (got {v})"))
    } else if v > u32::MAX as f64 {
        Err(format!("is out of range ({v})"))
    } else {
        Ok(v as u32)
    }
}

/// Minutes played as a float.
///
/// "MM:SS" keeps only the whole minutes; plain numbers are read directly.
/// Anything unparsable, negative or non-finite becomes 0.0, which the
/// eligibility filter then excludes.
pub fn parse_minutes(value: &Value) -> f64 {
    let minutes = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            match s.split_once(MINUTES_SEPARATOR) {
                Some((whole, _seconds)) => whole.trim().parse::<u32>().ok().map(f64::from),
                None => s.parse::<f64>().ok(),
            }
        }
        _ => None,
    };

    match minutes {
        Some(m) if m.is_finite() && m >= 0.0 => m,
        _ => {
            debug!("Unparsable minutes value {}, treating as 0", value);
            0.0
        }
    }
}
