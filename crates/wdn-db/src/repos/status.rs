//! The allocation status resolver.
//!
//! Derives a student-facing lifecycle phase purely from record presence —
//! questionnaire, trait profile, allocation — plus a queue-position estimate.
//! There is no stored status column to drift out of sync.

use chrono::{Duration, Utc};

use wdn_core::enums::AllocationPhase;
use wdn_core::status::{AssignedRoom, StatusReport};

use crate::error::DatabaseError;
use crate::service::WdnService;

impl WdnService {
    /// Resolve the allocation status for one student.
    ///
    /// Phases:
    /// - `Pending` — no questionnaire, or questionnaire without traits
    /// - `Processing` — trait profile exists but no allocation yet
    /// - `Completed` — an allocation exists (includes room and hostel)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the student does not exist, or
    /// `DatabaseError` if any lookup fails.
    pub async fn resolve_status(&self, student_id: &str) -> Result<StatusReport, DatabaseError> {
        let student = self.get_student(student_id).await?;
        let total_in_queue = self.count_submissions().await?;

        let Some(questionnaire) = self.load_questionnaire(&student.id).await? else {
            // Nothing submitted yet: pending with no queue position.
            return Ok(StatusReport {
                phase: AllocationPhase::Pending,
                assigned_room: None,
                queue_position: None,
                total_in_queue,
                estimated_completion: None,
                last_updated: student.created_at,
            });
        };

        if let Some(allocation) = self.load_allocation(&student.id).await? {
            let room = self.get_room(&allocation.room_id).await?;
            let hostel = self.get_hostel(&room.hostel_id).await?;
            return Ok(StatusReport {
                phase: AllocationPhase::Completed,
                assigned_room: Some(AssignedRoom {
                    room_id: room.id,
                    room_number: room.room_number,
                    hostel_name: hostel.name,
                }),
                queue_position: Some(0),
                total_in_queue,
                estimated_completion: None,
                last_updated: allocation.allocated_at,
            });
        }

        let queue_position = Some(self.queue_position(&student.id).await?);
        let estimated_completion =
            Some(Utc::now() + Duration::days(self.config().batch_lead_days));

        let (phase, last_updated) = match self.load_trait_profile(&student.id).await? {
            Some(profile) => (AllocationPhase::Processing, profile.generated_at),
            None => (AllocationPhase::Pending, questionnaire.submitted_at),
        };

        Ok(StatusReport {
            phase,
            assigned_room: None,
            queue_position,
            total_in_queue,
            estimated_completion,
            last_updated,
        })
    }

    /// Position in the undecided cohort queue: submissions without an
    /// allocation yet, submitted at-or-before this student's own.
    async fn queue_position(&self, student_id: &str) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT COUNT(*)
                 FROM questionnaire_responses q
                 LEFT JOIN allocations a ON a.student_id = q.student_id
                 WHERE a.student_id IS NULL
                   AND q.submitted_at <= (SELECT submitted_at FROM questionnaire_responses
                                          WHERE student_id = ?1)",
                [student_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
