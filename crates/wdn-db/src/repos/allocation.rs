//! The allocation engine.
//!
//! One run walks the unallocated cohort (students with a trait profile and
//! no allocation, ascending student ID), picks the minimum-mean-distance
//! eligible room for each, persists the allocation, and bumps the room's
//! occupancy. Per-student failures are isolated; whole runs are
//! single-flight.

use chrono::Utc;
use tracing::{error, info, warn};

use wdn_core::entities::{Allocation, AuditEntry, Room};
use wdn_core::enums::{AuditAction, EntityType, Gender, RunState};
use wdn_core::ids::{PREFIX_ALLOCATION, PREFIX_AUDIT};
use wdn_core::profile::TraitVector;
use wdn_core::run::{AllocationRunResult, RunHandle};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, parse_trait_vector};
use crate::service::WdnService;

/// One member of the unallocated cohort.
#[derive(Debug, Clone)]
pub struct CohortMember {
    pub student_id: String,
    pub gender: Gender,
    pub traits: TraitVector,
}

impl WdnService {
    /// Run the allocation engine over the full current cohort.
    ///
    /// The `handle` observes progress and can request cancellation
    /// ("stop scheduling new students" — completed allocations stay durable).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::RunInProgress` if another run holds the run
    /// guard, or the underlying error if the cohort load fails (the run is
    /// then `Aborted`). Per-student failures never surface here; they are
    /// logged and counted in the result.
    pub async fn run_allocation(
        &self,
        handle: &RunHandle,
    ) -> Result<AllocationRunResult, DatabaseError> {
        // Single-flight: two concurrent runs would read the same cohort and
        // could double-book a room past capacity.
        let Ok(_guard) = self.run_guard.try_lock() else {
            return Err(DatabaseError::RunInProgress);
        };

        handle.transition(RunState::Running)?;
        self.audit_run(AuditAction::RunStarted, None).await?;
        info!("allocation run started");

        let cohort = match self.load_unallocated_cohort().await {
            Ok(cohort) => cohort,
            Err(e) => {
                // Systemic failure before any student iteration: abort.
                error!(error = %e, "cohort load failed, aborting run");
                handle.transition(RunState::Aborted)?;
                if let Err(audit_err) = self.audit_run(AuditAction::RunAborted, None).await {
                    error!(error = %audit_err, "failed to record run abort");
                }
                return Err(e);
            }
        };
        info!(cohort = cohort.len(), "unallocated cohort loaded");

        for member in &cohort {
            if handle.is_cancelled() {
                info!(student_id = %member.student_id, "run cancelled, no further students scheduled");
                break;
            }

            match self.allocate_student(member).await {
                Ok(Some(allocation)) => {
                    info!(
                        student_id = %member.student_id,
                        room_id = %allocation.room_id,
                        score = allocation.compatibility_score,
                        "student allocated"
                    );
                    handle.count_processed();
                }
                Ok(None) => {
                    warn!(
                        student_id = %member.student_id,
                        gender = %member.gender,
                        "no eligible room, student skipped"
                    );
                    handle.count_skipped();
                }
                Err(e) => {
                    // Isolated: the run continues with the next student.
                    error!(student_id = %member.student_id, error = %e, "allocation failed");
                    handle.count_failed();
                }
            }
        }

        let result = handle.result();
        handle.transition(RunState::Completed)?;
        self.audit_run(
            AuditAction::RunCompleted,
            Some(serde_json::json!({
                "processed": result.processed,
                "skipped": result.skipped,
                "failed": result.failed,
            })),
        )
        .await?;
        info!(
            processed = result.processed,
            skipped = result.skipped,
            failed = result.failed,
            "allocation run completed"
        );
        Ok(result)
    }

    /// Students with a trait profile and no allocation, ascending student ID.
    ///
    /// The explicit sort makes runs reproducible; the engine and all tests
    /// depend on this traversal order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn load_unallocated_cohort(&self) -> Result<Vec<CohortMember>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT s.id, s.gender, t.chronotype, t.noise_sensitivity, t.sociability, t.study_focus
                 FROM students s
                 JOIN trait_profiles t ON t.student_id = s.id
                 LEFT JOIN allocations a ON a.student_id = s.id
                 WHERE a.student_id IS NULL
                 ORDER BY s.id ASC",
                (),
            )
            .await?;

        let mut cohort = Vec::new();
        while let Some(row) = rows.next().await? {
            cohort.push(CohortMember {
                student_id: row.get::<String>(0)?,
                gender: parse_enum(&row.get::<String>(1)?)?,
                traits: parse_trait_vector(&row, 2)?,
            });
        }
        Ok(cohort)
    }

    /// Allocate one cohort member. Returns `None` when no room is eligible
    /// (skip, not failure).
    async fn allocate_student(
        &self,
        member: &CohortMember,
    ) -> Result<Option<Allocation>, DatabaseError> {
        let candidates = self.load_candidate_rooms(member.gender).await?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let (room, score) = self.pick_best_room(&member.traits, &candidates).await?;

        #[allow(clippy::cast_possible_truncation)]
        let rounded = score.round() as i64;
        let allocation = self
            .persist_allocation(&member.student_id, &room.id, rounded)
            .await?;

        Ok(Some(allocation))
    }

    /// Score every candidate and return the minimum.
    ///
    /// Room score: 0 for an empty room (any empty eligible room is maximally
    /// acceptable), otherwise the arithmetic mean of trait distances to all
    /// current occupants. Ties keep the first-encountered room under the
    /// candidate ordering (strict `<` comparison).
    async fn pick_best_room<'a>(
        &self,
        traits: &TraitVector,
        candidates: &'a [Room],
    ) -> Result<(&'a Room, f64), DatabaseError> {
        let mut best: Option<(&Room, f64)> = None;

        for room in candidates {
            let occupants = self.load_occupants(&room.id).await?;
            let score = if occupants.is_empty() {
                0.0
            } else {
                #[allow(clippy::cast_precision_loss)]
                let mean = occupants
                    .iter()
                    .map(|o| f64::from(traits.distance(o)))
                    .sum::<f64>()
                    / occupants.len() as f64;
                mean
            };

            match best {
                Some((_, best_score)) if score >= best_score => {}
                _ => best = Some((room, score)),
            }
        }

        // Candidates are non-empty, so best is always set.
        best.ok_or(DatabaseError::NoResult)
    }

    /// Persist a new allocation row for a student and claim the seat, in
    /// one transaction.
    ///
    /// The occupancy UPDATE is guarded by `occupied < capacity` in its own
    /// predicate: a room that filled up since the candidate query updates
    /// zero rows, the transaction rolls back, and no allocation row
    /// survives — `occupied <= capacity` and "allocation implies a counted
    /// seat" can never diverge.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the room was already full
    /// (nothing is persisted then), or `DatabaseError` if the student
    /// already has an allocation (UNIQUE violation) or a write fails.
    pub async fn persist_allocation(
        &self,
        student_id: &str,
        room_id: &str,
        score: i64,
    ) -> Result<Allocation, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ALLOCATION).await?;
        let explanation = "Allocated based on trait compatibility";

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO allocations
             (id, student_id, room_id, compatibility_score, explanation, allocated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            libsql::params![
                id.as_str(),
                student_id,
                room_id,
                score,
                explanation,
                now.to_rfc3339()
            ],
        )
        .await?;

        let updated = tx
            .execute(
                "UPDATE rooms SET occupied = occupied + 1
                 WHERE id = ?1 AND occupied < capacity",
                [room_id],
            )
            .await?;
        if updated == 0 {
            return Err(DatabaseError::InvalidState(format!(
                "room {room_id} is already at capacity"
            )));
        }
        tx.commit().await?;

        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id,
            entity_type: EntityType::Allocation,
            entity_id: id.clone(),
            action: AuditAction::Allocated,
            detail: Some(serde_json::json!({
                "student_id": student_id,
                "room_id": room_id,
                "score": score,
            })),
            created_at: now,
        })
        .await?;

        Ok(Allocation {
            id,
            student_id: student_id.to_string(),
            room_id: room_id.to_string(),
            compatibility_score: score,
            explanation: Some(explanation.to_string()),
            allocated_at: now,
        })
    }

    /// Load a student's allocation, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn load_allocation(
        &self,
        student_id: &str,
    ) -> Result<Option<Allocation>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, student_id, room_id, compatibility_score, explanation, allocated_at
                 FROM allocations WHERE student_id = ?1",
                [student_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        Ok(Some(row_to_allocation(&row)?))
    }

    async fn audit_run(
        &self,
        action: AuditAction,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now();
        let audit_id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(&AuditEntry {
            id: audit_id.clone(),
            entity_type: EntityType::Run,
            entity_id: audit_id,
            action,
            detail,
            created_at: now,
        })
        .await
    }
}

/// Convert a libSQL row to an `Allocation` struct.
fn row_to_allocation(row: &libsql::Row) -> Result<Allocation, DatabaseError> {
    Ok(Allocation {
        id: row.get::<String>(0)?,
        student_id: row.get::<String>(1)?,
        room_id: row.get::<String>(2)?,
        compatibility_score: row.get::<i64>(3)?,
        explanation: crate::helpers::get_opt_string(row, 4)?,
        allocated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}
