use serde_json::json;

use wdn_db::service::WdnService;

use crate::cli::OutputFormat;
use crate::output;

pub async fn handle(service: &WdnService, format: OutputFormat) -> anyhow::Result<()> {
    let dashboard = service.dashboard_stats().await?;
    let compatibility = service.compatibility_stats().await?;
    output::output(
        &json!({ "dashboard": dashboard, "compatibility": compatibility }),
        format,
    )
}
