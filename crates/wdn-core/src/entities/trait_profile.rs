use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::profile::TraitVector;

/// A student's derived trait vector plus generation metadata.
///
/// At most one per student; immutable once computed unless explicitly
/// regenerated (which requires deleting the stored row first).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TraitProfile {
    pub student_id: String,
    #[serde(flatten)]
    pub traits: TraitVector,
    pub generated_at: DateTime<Utc>,
}
