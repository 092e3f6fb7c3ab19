//! Entity structs for all Warden domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation. Ownership is strictly acyclic:
//! Hostel → Room → Allocation → Student.

mod allocation;
mod audit;
mod hostel;
mod questionnaire;
mod student;
mod trait_profile;

pub use allocation::Allocation;
pub use audit::AuditEntry;
pub use hostel::{Hostel, Room};
pub use questionnaire::{AnswerPair, QuestionnaireSubmission};
pub use student::Student;
pub use trait_profile::TraitProfile;
