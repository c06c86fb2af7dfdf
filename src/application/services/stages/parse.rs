use crate::domain::{ArtifactValue, Job, ParsedStatement};

use super::{StageError, StageExecutors, StageOutcome, within};

impl StageExecutors {
    pub(super) async fn parse_statements(&self, job: &Job) -> Result<StageOutcome, StageError> {
        let documents = &job.input.documents;
        if documents.is_empty() {
            return Err(StageError::InvalidInput(
                "no statements were uploaded".to_string(),
            ));
        }

        let mut statements = Vec::with_capacity(documents.len());
        for document in documents {
            let data = self
                .collaborators
                .artifact_store
                .fetch(&document.storage_path)
                .await?;

            let statement = within(
                "statement parser",
                self.settings.timeouts.parse,
                self.collaborators.statement_parser.parse(&data, document),
            )
            .await?
            .map_err(|e| StageError::InvalidInput(format!("{}: {}", document.filename, e)))?;

            tracing::debug!(
                filename = %document.filename,
                volume = statement.total_volume,
                transactions = statement.transaction_count,
                "Statement parsed"
            );
            statements.push(statement);
        }

        let merged = ParsedStatement::merge(statements)
            .ok_or_else(|| StageError::InvalidInput("no statements were parsed".to_string()))?;
        if !merged.is_finite() {
            return Err(StageError::InvalidInput(
                "combined statement totals are out of range".to_string(),
            ));
        }

        let message = format!(
            "Parsed {} statement(s): ${:.2} volume across {} transactions",
            documents.len(),
            merged.total_volume,
            merged.transaction_count
        );

        Ok(StageOutcome::new(message).with_artifact(ArtifactValue::Statement(merged)))
    }
}
