//! Questionnaire repository.
//!
//! One submission per student, stored as a JSON answer array. Resubmission
//! replaces the stored answers; it does not re-derive an existing trait
//! profile (regeneration requires deleting the profile first).

use chrono::Utc;

use wdn_core::entities::{AnswerPair, AuditEntry, QuestionnaireSubmission};
use wdn_core::enums::{AuditAction, EntityType};
use wdn_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::WdnService;

impl WdnService {
    /// Submit (or resubmit) a student's questionnaire answers.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the student does not exist or the write fails.
    pub async fn submit_questionnaire(
        &self,
        student_id: &str,
        answers: &[AnswerPair],
    ) -> Result<QuestionnaireSubmission, DatabaseError> {
        // Fails fast with NoResult if the student is unknown.
        let student = self.get_student(student_id).await?;

        let now = Utc::now();
        let answers_json =
            serde_json::to_string(answers).map_err(|e| DatabaseError::Other(e.into()))?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO questionnaire_responses (student_id, answers, submitted_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(student_id) DO UPDATE
                 SET answers = excluded.answers, submitted_at = excluded.submitted_at",
                libsql::params![student.id.as_str(), answers_json.as_str(), now.to_rfc3339()],
            )
            .await?;

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: EntityType::Questionnaire,
            entity_id: student.id.clone(),
            action: AuditAction::QuestionnaireSubmitted,
            detail: Some(serde_json::json!({ "answers": answers.len() })),
            created_at: now,
        })
        .await?;

        Ok(QuestionnaireSubmission {
            student_id: student.id,
            answers: answers.to_vec(),
            submitted_at: now,
        })
    }

    /// Load a student's questionnaire submission, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the stored JSON is corrupt.
    pub async fn load_questionnaire(
        &self,
        student_id: &str,
    ) -> Result<Option<QuestionnaireSubmission>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT student_id, answers, submitted_at
                 FROM questionnaire_responses WHERE student_id = ?1",
                [student_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let answers: Vec<AnswerPair> = serde_json::from_str(&row.get::<String>(1)?)
            .map_err(|e| DatabaseError::Query(format!("Invalid answers JSON: {e}")))?;

        Ok(Some(QuestionnaireSubmission {
            student_id: row.get::<String>(0)?,
            answers,
            submitted_at: parse_datetime(&row.get::<String>(2)?)?,
        }))
    }

    /// Count all questionnaire submissions.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_submissions(&self) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM questionnaire_responses", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
