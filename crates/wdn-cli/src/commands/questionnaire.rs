use anyhow::Context;

use wdn_core::entities::AnswerPair;
use wdn_db::service::WdnService;

use crate::cli::{OutputFormat, QuestionnaireCommands};
use crate::output;

pub async fn handle(
    action: QuestionnaireCommands,
    service: &WdnService,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        QuestionnaireCommands::Submit {
            student_id,
            answers,
        } => {
            let pairs = parse_answers(&answers)?;
            let submission = service.submit_questionnaire(&student_id, &pairs).await?;
            output::output(&submission, format)
        }
        QuestionnaireCommands::Get { student_id } => {
            let submission = service
                .load_questionnaire(&student_id)
                .await?
                .context("no questionnaire submitted for that student")?;
            output::output(&submission, format)
        }
    }
}

fn parse_answers(raw: &[String]) -> anyhow::Result<Vec<AnswerPair>> {
    raw.iter()
        .map(|entry| {
            let (key, value) = entry
                .split_once('=')
                .with_context(|| format!("invalid answer '{entry}', expected KEY=VALUE"))?;
            Ok(AnswerPair {
                question_key: key.to_string(),
                answer: value.to_string(),
            })
        })
        .collect()
}
