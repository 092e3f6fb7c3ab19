use wdn_db::service::WdnService;

use crate::cli::{Commands, OutputFormat};

pub mod audit;
pub mod hostel;
pub mod questionnaire;
pub mod run;
pub mod stats;
pub mod status;
pub mod student;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    service: &WdnService,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Student { action } => student::handle(action, service, format).await,
        Commands::Questionnaire { action } => questionnaire::handle(action, service, format).await,
        Commands::Hostel { action } => hostel::handle(action, service, format).await,
        Commands::GenerateTraits => run::generate_traits(service, format).await,
        Commands::Allocate => run::allocate(service, format).await,
        Commands::Status { student_id } => status::handle(&student_id, service, format).await,
        Commands::Stats => stats::handle(service, format).await,
        Commands::Audit {
            entity_type,
            entity_id,
            action,
            limit,
        } => audit::handle(entity_type, entity_id, action, limit, service, format).await,
    }
}

/// Parse a lowercase wire value ("female", "mixed", "300", ...) into one of
/// the serde-tagged domain enums.
pub(crate) fn parse_variant<T: serde::de::DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| anyhow::anyhow!("unrecognized value '{raw}'"))
}
