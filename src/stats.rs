use serde::Serialize;

/// Counters collected while indexing raw reports.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub total: usize,
    pub accepted: usize,

    // drop reasons
    pub missing_station: usize,
    pub missing_timestamp: usize,
    pub bad_timestamp: usize,
}

impl IngestStats {
    pub fn dropped(&self) -> usize {
        self.missing_station + self.missing_timestamp + self.bad_timestamp
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn accepted_pct(&self) -> f64 {
        Self::pct(self.accepted, self.total)
    }
}
