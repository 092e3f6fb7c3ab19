//! Trait profile repository and the trait-generation pass.
//!
//! Profiles are derived from questionnaire submissions by a `TraitSource`
//! (the shipped rule-based deriver, or an external alternative behind the
//! same seam) and written at most once per student.

use chrono::Utc;
use tracing::{error, info};

use wdn_core::derive::TraitSource;
use wdn_core::entities::{AuditEntry, TraitProfile};
use wdn_core::enums::{AuditAction, EntityType};
use wdn_core::ids::PREFIX_AUDIT;
use wdn_core::profile::TraitVector;
use wdn_core::run::TraitRunResult;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_trait_vector};
use crate::service::WdnService;

impl WdnService {
    /// Load a student's trait profile, if derived.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or stored traits are corrupt.
    pub async fn load_trait_profile(
        &self,
        student_id: &str,
    ) -> Result<Option<TraitProfile>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT student_id, chronotype, noise_sensitivity, sociability, study_focus, generated_at
                 FROM trait_profiles WHERE student_id = ?1",
                [student_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        Ok(Some(TraitProfile {
            student_id: row.get::<String>(0)?,
            traits: parse_trait_vector(&row, 1)?,
            generated_at: parse_datetime(&row.get::<String>(5)?)?,
        }))
    }

    /// Persist a derived trait vector for a student.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the student already has a profile
    /// (PRIMARY KEY conflict) or the write fails.
    pub async fn persist_trait_profile(
        &self,
        student_id: &str,
        traits: TraitVector,
    ) -> Result<TraitProfile, DatabaseError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO trait_profiles
                 (student_id, chronotype, noise_sensitivity, sociability, study_focus, generated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    student_id,
                    i64::from(traits.chronotype),
                    i64::from(traits.noise_sensitivity),
                    i64::from(traits.sociability),
                    i64::from(traits.study_focus),
                    now.to_rfc3339()
                ],
            )
            .await?;

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: EntityType::TraitProfile,
            entity_id: student_id.to_string(),
            action: AuditAction::TraitsGenerated,
            detail: Some(serde_json::json!({
                "chronotype": traits.chronotype,
                "noise_sensitivity": traits.noise_sensitivity,
                "sociability": traits.sociability,
                "study_focus": traits.study_focus,
            })),
            created_at: now,
        })
        .await?;

        Ok(TraitProfile {
            student_id: student_id.to_string(),
            traits,
            generated_at: now,
        })
    }

    /// Derive and persist trait profiles for every questionnaire submission
    /// whose student does not have one yet.
    ///
    /// Per-student failures (invariant violations from the source,
    /// persistence errors) are logged with full context and counted, never
    /// thrown — the pass always finishes the remaining students.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` only if the submission listing itself fails.
    pub async fn generate_traits(
        &self,
        source: &dyn TraitSource,
    ) -> Result<TraitRunResult, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT q.student_id, q.answers
                 FROM questionnaire_responses q
                 ORDER BY q.student_id ASC",
                (),
            )
            .await?;

        let mut submissions = Vec::new();
        while let Some(row) = rows.next().await? {
            submissions.push((row.get::<String>(0)?, row.get::<String>(1)?));
        }

        let mut result = TraitRunResult::default();

        for (student_id, answers_json) in submissions {
            if self.load_trait_profile(&student_id).await?.is_some() {
                result.skipped += 1;
                continue;
            }

            let outcome = self
                .derive_one(source, &student_id, &answers_json)
                .await;
            match outcome {
                Ok(()) => result.processed += 1,
                Err(e) => {
                    error!(student_id, error = %e, "trait generation failed");
                    result.failed += 1;
                }
            }
        }

        info!(
            processed = result.processed,
            skipped = result.skipped,
            failed = result.failed,
            "trait generation pass finished"
        );
        Ok(result)
    }

    async fn derive_one(
        &self,
        source: &dyn TraitSource,
        student_id: &str,
        answers_json: &str,
    ) -> Result<(), DatabaseError> {
        let answers: Vec<wdn_core::entities::AnswerPair> = serde_json::from_str(answers_json)
            .map_err(|e| DatabaseError::Query(format!("Invalid answers JSON: {e}")))?;
        let traits = source.derive(&answers)?;
        self.persist_trait_profile(student_id, traits).await?;
        Ok(())
    }
}
