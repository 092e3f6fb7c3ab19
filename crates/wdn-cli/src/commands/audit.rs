use wdn_db::repos::audit::AuditFilter;
use wdn_db::service::WdnService;

use crate::cli::OutputFormat;
use crate::commands::parse_variant;
use crate::output;

pub async fn handle(
    entity_type: Option<String>,
    entity_id: Option<String>,
    action: Option<String>,
    limit: Option<u32>,
    service: &WdnService,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let filter = AuditFilter {
        entity_type: entity_type.as_deref().map(parse_variant).transpose()?,
        entity_id,
        action: action.as_deref().map(parse_variant).transpose()?,
        limit,
    };
    let entries = service.query_audit(&filter).await?;
    output::output(&entries, format)
}
