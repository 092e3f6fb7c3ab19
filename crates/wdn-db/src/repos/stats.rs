//! Operator-facing statistics over persisted allocations.
//!
//! Raw distances are normalized to percentages only here, at the reporting
//! boundary — the engine and the allocation rows always carry the raw
//! integer distance.

use serde::Serialize;

use wdn_core::profile::compatibility_percent;

use crate::error::DatabaseError;
use crate::service::WdnService;

/// Compatibility distribution bands, as shown on the operator dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompatibilityStats {
    pub total_allocations: i64,
    /// Mean of the per-allocation compatibility percentages.
    pub average_percent: u8,
    pub band_90_100: i64,
    pub band_80_89: i64,
    pub band_70_79: i64,
    pub band_60_69: i64,
    pub below_60: i64,
}

/// Headline counts for the operator dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub with_questionnaire: i64,
    pub allocated: i64,
    pub pending_allocation: i64,
}

impl WdnService {
    /// Compatibility percentage stats over all persisted allocations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn compatibility_stats(&self) -> Result<CompatibilityStats, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT compatibility_score FROM allocations", ())
            .await?;

        let mut stats = CompatibilityStats::default();
        let mut percent_sum: u64 = 0;

        while let Some(row) = rows.next().await? {
            let raw = row.get::<i64>(0)?;
            let score = u32::try_from(raw.max(0)).unwrap_or(0);
            let pct = compatibility_percent(score);

            stats.total_allocations += 1;
            percent_sum += u64::from(pct);
            match pct {
                90..=100 => stats.band_90_100 += 1,
                80..=89 => stats.band_80_89 += 1,
                70..=79 => stats.band_70_79 += 1,
                60..=69 => stats.band_60_69 += 1,
                _ => stats.below_60 += 1,
            }
        }

        if stats.total_allocations > 0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let avg = (percent_sum as f64 / stats.total_allocations as f64).round() as u8;
            stats.average_percent = avg;
        }
        Ok(stats)
    }

    /// Headline counts: students, questionnaires, allocated, pending.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any count query fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, DatabaseError> {
        let total_students = self.count_rows("students").await?;
        let with_questionnaire = self.count_rows("questionnaire_responses").await?;
        let allocated = self.count_rows("allocations").await?;

        Ok(DashboardStats {
            total_students,
            with_questionnaire,
            allocated,
            pending_allocation: total_students - allocated,
        })
    }

    async fn count_rows(&self, table: &str) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let mut rows = self.db().conn().query(&sql, ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
