use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Gender, Level};

/// A registered student. Created at registration; the trait profile is
/// attached later by a trait-generation pass over questionnaire submissions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub email: String,
    pub name: String,
    pub gender: Gender,
    pub level: Level,
    pub matric_no: String,
    pub created_at: DateTime<Utc>,
}
