//! # wdn-core
//!
//! Core types and pure allocation logic for Warden.
//!
//! This crate provides the foundational pieces shared across all Warden crates:
//! - Entity structs for all domain objects (students, hostels, rooms, allocations)
//! - Status enums with state machine transitions
//! - The bounded trait vector and its compatibility distance
//! - The deterministic rule-based trait deriver behind the `TraitSource` seam
//! - Run-scoped allocation state (progress counters, cancellation)
//! - ID prefix constants and cross-cutting error types
//!
//! Everything here is I/O-free; persistence lives in `wdn-db`.

pub mod derive;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod profile;
pub mod run;
pub mod status;
