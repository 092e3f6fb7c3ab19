//! Status enums, gender policies, and actions for Warden.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Gender of a student, as captured at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GenderPolicy
// ---------------------------------------------------------------------------

/// Gender eligibility of a hostel.
///
/// A student is eligible for rooms in a hostel when the policy matches the
/// student's gender, or the policy is `mixed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenderPolicy {
    Male,
    Female,
    Mixed,
}

impl GenderPolicy {
    /// Whether a student of the given gender may be housed under this policy.
    #[must_use]
    pub const fn admits(self, gender: Gender) -> bool {
        matches!(
            (self, gender),
            (Self::Mixed, _) | (Self::Male, Gender::Male) | (Self::Female, Gender::Female)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for GenderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Academic level of a student (100 through 500).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Level {
    #[serde(rename = "100")]
    L100,
    #[serde(rename = "200")]
    L200,
    #[serde(rename = "300")]
    L300,
    #[serde(rename = "400")]
    L400,
    #[serde(rename = "500")]
    L500,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L100 => "100",
            Self::L200 => "200",
            Self::L300 => "300",
            Self::L400 => "400",
            Self::L500 => "500",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RunState
// ---------------------------------------------------------------------------

/// State of one allocation run.
///
/// ```text
/// idle → running → completed
///                → aborted
/// ```
///
/// `Aborted` occurs only on a systemic failure before or between student
/// iterations (e.g., the cohort query itself fails). A single student's
/// failure never aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted,
}

impl RunState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Running],
            Self::Running => &[Self::Completed, Self::Aborted],
            Self::Completed | Self::Aborted => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AllocationPhase
// ---------------------------------------------------------------------------

/// Student-facing allocation lifecycle, derived from record presence.
///
/// ```text
/// pending → processing → completed
/// ```
///
/// `Pending` = no questionnaire, or questionnaire without a trait profile.
/// `Processing` = trait profile exists but no allocation yet.
/// `Completed` = an allocation row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPhase {
    Pending,
    Processing,
    Completed,
}

impl AllocationPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for AllocationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type tag for audit entries and cross-entity references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Student,
    Questionnaire,
    TraitProfile,
    Hostel,
    Room,
    Allocation,
    Run,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Questionnaire => "questionnaire",
            Self::TraitProfile => "trait_profile",
            Self::Hostel => "hostel",
            Self::Room => "room",
            Self::Allocation => "allocation",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Registered,
    QuestionnaireSubmitted,
    TraitsGenerated,
    Allocated,
    RunStarted,
    RunCompleted,
    RunAborted,
    HostelCreated,
    HostelDeleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::QuestionnaireSubmitted => "questionnaire_submitted",
            Self::TraitsGenerated => "traits_generated",
            Self::Allocated => "allocated",
            Self::RunStarted => "run_started",
            Self::RunCompleted => "run_completed",
            Self::RunAborted => "run_aborted",
            Self::HostelCreated => "hostel_created",
            Self::HostelDeleted => "hostel_deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
