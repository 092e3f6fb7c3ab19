//! ID prefix constants for Warden entities.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by `wdn-db` via SQL
//! `randomblob(4)`. The prefix makes an entity's type readable from its ID.

pub const PREFIX_STUDENT: &str = "stu";
pub const PREFIX_HOSTEL: &str = "hst";
pub const PREFIX_ROOM: &str = "rom";
pub const PREFIX_ALLOCATION: &str = "alc";
pub const PREFIX_AUDIT: &str = "aud";

/// All known prefixes, for tests and validation.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_STUDENT,
    PREFIX_HOSTEL,
    PREFIX_ROOM,
    PREFIX_ALLOCATION,
    PREFIX_AUDIT,
];
