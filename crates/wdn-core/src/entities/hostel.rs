use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::GenderPolicy;

/// A hostel building. Owns a set of rooms (exclusive, 1-to-many) and carries
/// the gender policy that gates room eligibility during allocation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Hostel {
    pub id: String,
    pub name: String,
    pub location: String,
    pub warden: String,
    pub gender: GenderPolicy,
    pub created_at: DateTime<Utc>,
}

/// A room inside a hostel.
///
/// `occupied` is the only field mutated during allocation, and only ever
/// incremented by the engine with increments serialized per run
/// (0 ≤ occupied ≤ capacity).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub hostel_id: String,
    pub room_number: String,
    pub capacity: i64,
    pub occupied: i64,
}
