//! Repository modules implementing all Warden operations.
//!
//! Each module adds methods to `WdnService` via `impl WdnService` blocks.
//! The allocation engine lives in [`allocation`], the status resolver in
//! [`status`].

pub mod allocation;
pub mod audit;
pub mod hostel;
pub mod questionnaire;
pub mod room;
pub mod stats;
pub mod status;
pub mod student;
pub mod trait_profile;
