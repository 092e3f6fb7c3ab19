use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One raw questionnaire answer: a flat question key and its answer value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnswerPair {
    pub question_key: String,
    pub answer: String,
}

/// A student's lifestyle questionnaire submission.
///
/// One per student; resubmission replaces the stored answers. Answers are
/// persisted as a JSON array in a single TEXT column.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionnaireSubmission {
    pub student_id: String,
    pub answers: Vec<AnswerPair>,
    pub submitted_at: DateTime<Utc>,
}
