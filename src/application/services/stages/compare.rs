use crate::domain::{ArtifactName, ArtifactValue, ComparisonData, Job};

use super::{StageError, StageExecutors, StageOutcome};

impl StageExecutors {
    pub(super) fn compute_comparison(&self, job: &Job) -> Result<StageOutcome, StageError> {
        let statement = job
            .artifacts
            .statement
            .as_ref()
            .ok_or(StageError::MissingArtifact(ArtifactName::Statement))?;

        let comparison = ComparisonData::compute(statement, &self.settings.pricing)
            .map_err(|e| StageError::InvalidInput(e.to_string()))?;

        let message = if comparison.saves_money() {
            format!(
                "Estimated savings of ${:.2} per month ({:.2}%)",
                comparison.monthly_savings, comparison.savings_percent
            )
        } else {
            "Current pricing is already competitive".to_string()
        };

        Ok(StageOutcome::new(message).with_artifact(ArtifactValue::Comparison(comparison)))
    }
}
