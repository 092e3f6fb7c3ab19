use wdn_core::enums::{Gender, Level};
use wdn_db::service::WdnService;

use crate::cli::{OutputFormat, StudentCommands};
use crate::commands::parse_variant;
use crate::output;

pub async fn handle(
    action: StudentCommands,
    service: &WdnService,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        StudentCommands::Register {
            email,
            name,
            gender,
            level,
            matric_no,
        } => {
            let gender: Gender = parse_variant(&gender)?;
            let level: Level = parse_variant(&level)?;
            let student = service
                .register_student(&email, &name, gender, level, &matric_no)
                .await?;
            output::output(&student, format)
        }
        StudentCommands::Get { id } => {
            let student = service.get_student(&id).await?;
            output::output(&student, format)
        }
        StudentCommands::List { limit } => {
            let students = service.list_students(limit).await?;
            output::output(&students, format)
        }
    }
}
