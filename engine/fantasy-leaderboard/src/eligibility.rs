use crate::config::EligibilityConfig;
use crate::models::StatRecord;

/// Drops garbage-time appearances before anything gets ranked
#[derive(Debug, Clone, Default)]
pub struct EligibilityFilter {
    config: EligibilityConfig,
}

impl EligibilityFilter {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    /// Eligible iff minutes played is strictly above the threshold
    pub fn is_eligible(&self, record: &StatRecord) -> bool {
        record.minutes > self.config.min_minutes_exclusive
    }

    /// Split records into (eligible, ineligible count), keeping input order
    pub fn filter(&self, records: Vec<StatRecord>) -> (Vec<StatRecord>, usize) {
        let total = records.len();
        let eligible: Vec<StatRecord> =
            records.into_iter().filter(|record| self.is_eligible(record)).collect();
        let dropped = total - eligible.len();
        (eligible, dropped)
    }
}
