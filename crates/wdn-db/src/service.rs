//! Service layer orchestrating database mutations with audit and run guarding.
//!
//! `WdnService` wraps `WdnDb` (raw database access), the allocation
//! configuration, and the run guard that keeps whole allocation runs
//! single-flight. All repo methods are implemented as `impl WdnService`.

use tokio::sync::Mutex;

use wdn_config::AllocationConfig;

use crate::WdnDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with audit trail and run serialization.
///
/// Mutation methods follow this protocol:
/// 1. Execute SQL
/// 2. Append audit entry
/// 3. Return the typed entity
pub struct WdnService {
    db: WdnDb,
    config: AllocationConfig,
    /// Held for the duration of an allocation run. `try_lock` failure means
    /// another run is in flight; callers get `DatabaseError::RunInProgress`
    /// instead of a second cohort read that could double-book rooms.
    pub(crate) run_guard: Mutex<()>,
}

impl WdnService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    /// * `config` — Allocation tuning (batch lead days, list limits).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, config: AllocationConfig) -> Result<Self, DatabaseError> {
        let db = WdnDb::open_local(db_path).await?;
        Ok(Self::from_db(db, config))
    }

    /// Create from an existing `WdnDb` (for testing).
    #[must_use]
    pub fn from_db(db: WdnDb, config: AllocationConfig) -> Self {
        Self {
            db,
            config,
            run_guard: Mutex::new(()),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &WdnDb {
        &self.db
    }

    /// Access the allocation configuration.
    #[must_use]
    pub const fn config(&self) -> &AllocationConfig {
        &self.config
    }
}
