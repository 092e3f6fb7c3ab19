use wdn_db::service::WdnService;

use crate::cli::OutputFormat;
use crate::output;

pub async fn handle(
    student_id: &str,
    service: &WdnService,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = service.resolve_status(student_id).await?;
    output::output(&report, format)
}
