//! Student-facing allocation status reporting types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::AllocationPhase;

/// Room assignment details included in a `Completed` status report.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssignedRoom {
    pub room_id: String,
    pub room_number: String,
    pub hostel_name: String,
}

/// The resolved allocation status for one student, as shown to that student.
///
/// Derived entirely from record presence (questionnaire, trait profile,
/// allocation) — there is no stored status column to drift out of sync.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusReport {
    pub phase: AllocationPhase,
    /// Set only when `phase == Completed`.
    pub assigned_room: Option<AssignedRoom>,
    /// Position in the undecided cohort queue; 0 once completed, `None`
    /// before any questionnaire is submitted.
    pub queue_position: Option<i64>,
    /// Count of all questionnaire submissions.
    pub total_in_queue: i64,
    /// Batch-cadence estimate (now + configured lead days); `None` before
    /// a questionnaire exists and once completed.
    pub estimated_completion: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}
