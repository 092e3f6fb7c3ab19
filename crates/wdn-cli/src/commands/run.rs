use tracing::warn;

use wdn_core::derive::RuleBasedDeriver;
use wdn_core::run::RunHandle;
use wdn_db::service::WdnService;

use crate::cli::OutputFormat;
use crate::output;

/// Derive trait profiles for every submission without one.
pub async fn generate_traits(service: &WdnService, format: OutputFormat) -> anyhow::Result<()> {
    let result = service.generate_traits(&RuleBasedDeriver).await?;
    output::output(&result, format)
}

/// Run the allocation engine. Ctrl-C requests cancellation: no further
/// students are scheduled, already-written allocations stay.
pub async fn allocate(service: &WdnService, format: OutputFormat) -> anyhow::Result<()> {
    let handle = RunHandle::new();

    let watcher = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancellation requested, finishing current student");
            watcher.cancel();
        }
    });

    let result = service.run_allocation(&handle).await?;
    output::output(&result, format)
}
