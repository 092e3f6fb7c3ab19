//! Allocation engine configuration.

use serde::{Deserialize, Serialize};

/// Default completion-estimate lead, in days.
///
/// The "+5 days" shown to students is a fixed batch-cadence heuristic,
/// not a throughput-derived estimate.
const fn default_batch_lead_days() -> i64 {
    5
}

/// Default result limit for list commands.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllocationConfig {
    /// Days added to "now" when estimating a student's completion date.
    #[serde(default = "default_batch_lead_days")]
    pub batch_lead_days: i64,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            batch_lead_days: default_batch_lead_days(),
            default_limit: default_limit(),
        }
    }
}
