use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A student-to-room assignment produced by the allocation engine.
///
/// At most one per student (the student ID is the idempotency key). Never
/// mutated; deleted only as part of the hostel deletion cascade.
/// `compatibility_score` stores the raw rounded distance, not a percentage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Allocation {
    pub id: String,
    pub student_id: String,
    pub room_id: String,
    pub compatibility_score: i64,
    pub explanation: Option<String>,
    pub allocated_at: DateTime<Utc>,
}
