//! Run-scoped allocation state.
//!
//! A `RunHandle` is created per allocation run and shared between the engine
//! and any observer (CLI progress display, tests). It is explicitly not
//! process-wide state — multiple isolated runs can coexist in tests, each
//! with its own handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RunState;
use crate::errors::CoreError;

/// Summary returned by one allocation run over the full cohort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AllocationRunResult {
    /// Students that received an allocation.
    pub processed: u64,
    /// Students with no eligible room (counted, not failed).
    pub skipped: u64,
    /// Students whose processing hit an error (logged, run continued).
    pub failed: u64,
}

/// Summary returned by one trait-generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TraitRunResult {
    /// Submissions that produced a new trait profile.
    pub processed: u64,
    /// Submissions whose student already had a profile.
    pub skipped: u64,
    /// Submissions whose derivation or persistence failed.
    pub failed: u64,
}

/// Shared, observable state for one allocation run.
///
/// Cloning the handle shares the underlying state. Cancellation means
/// "stop scheduling new students" — completed allocations stay durable,
/// nothing is rolled back.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    inner: Arc<RunInner>,
}

#[derive(Debug)]
struct RunInner {
    state: AtomicU8,
    cancelled: AtomicBool,
    processed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl Default for RunInner {
    fn default() -> Self {
        Self {
            state: AtomicU8::new(state_to_u8(RunState::Idle)),
            cancelled: AtomicBool::new(false),
            processed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

const fn state_to_u8(state: RunState) -> u8 {
    match state {
        RunState::Idle => 0,
        RunState::Running => 1,
        RunState::Completed => 2,
        RunState::Aborted => 3,
    }
}

const fn u8_to_state(raw: u8) -> RunState {
    match raw {
        1 => RunState::Running,
        2 => RunState::Completed,
        3 => RunState::Aborted,
        _ => RunState::Idle,
    }
}

impl RunHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the run.
    #[must_use]
    pub fn state(&self) -> RunState {
        u8_to_state(self.inner.state.load(Ordering::Acquire))
    }

    /// Transition the run to `next`, validating against the state machine.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` if the transition is not
    /// allowed from the current state.
    pub fn transition(&self, next: RunState) -> Result<(), CoreError> {
        let current = self.state();
        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                entity_type: "run".to_string(),
                id: String::new(),
                from: current.to_string(),
                to: next.to_string(),
            });
        }
        self.inner
            .state
            .store(state_to_u8(next), Ordering::Release);
        Ok(())
    }

    /// Request cancellation: no further students will be scheduled.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    pub fn count_processed(&self) {
        self.inner.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_skipped(&self) {
        self.inner.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count_failed(&self) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the live counters.
    #[must_use]
    pub fn result(&self) -> AllocationRunResult {
        AllocationRunResult {
            processed: self.inner.processed.load(Ordering::Relaxed),
            skipped: self.inner.skipped.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
        }
    }
}
