use crate::domain::{
    ArtifactName, ArtifactValue, BusinessProfile, ComparisonData, Job, MerchantProfile, Narrative,
};

use super::{StageError, StageExecutors, StageOutcome, within};

const NARRATIVE_PROMPT: &str = "Write a concise, friendly executive summary (two short paragraphs) \
for a payment processing proposal addressed to the merchant described in the context. \
Mention the estimated savings only if they are positive. Do not invent figures.";

impl StageExecutors {
    pub(super) async fn generate_narrative(&self, job: &Job) -> Result<StageOutcome, StageError> {
        if !job.input.options.include_narrative {
            return Ok(StageOutcome::new("Narrative not requested; skipped"));
        }

        let comparison = job
            .artifacts
            .comparison
            .as_ref()
            .ok_or(StageError::MissingArtifact(ArtifactName::Comparison))?;
        let profile = job.artifacts.business_profile.clone().unwrap_or_default();
        let context = narrative_context(&job.input.merchant, comparison, &profile);

        let text = within(
            "narrative generator",
            self.settings.timeouts.narrative,
            self.collaborators
                .narrative_generator
                .generate(NARRATIVE_PROMPT, &context),
        )
        .await?
        .map_err(|e| StageError::collaborator("narrative generator", e))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(StageError::collaborator(
                "narrative generator",
                "returned empty text",
            ));
        }

        Ok(StageOutcome::new("Generated proposal narrative")
            .with_artifact(ArtifactValue::Narrative(Narrative::generated(text.to_string()))))
    }
}

fn narrative_context(
    merchant: &MerchantProfile,
    comparison: &ComparisonData,
    profile: &BusinessProfile,
) -> String {
    let mut lines = vec![format!("Merchant: {}", merchant.business_name)];
    if let Some(industry) = &merchant.industry {
        lines.push(format!("Industry: {}", industry));
    }
    if let Some(contact) = &merchant.contact_name {
        lines.push(format!("Contact: {}", contact));
    }
    if let Some(description) = &profile.description {
        lines.push(format!("About: {}", description));
    }
    lines.push(format!("Monthly volume: ${:.2}", comparison.monthly_volume));
    lines.push(format!(
        "Current effective rate: {:.2}%",
        comparison.current_effective_rate * 100.0
    ));
    lines.push(format!(
        "Proposed effective rate: {:.2}%",
        comparison.proposed_effective_rate * 100.0
    ));
    lines.push(format!(
        "Estimated monthly savings: ${:.2}",
        comparison.monthly_savings
    ));
    lines.push(format!(
        "Estimated annual savings: ${:.2}",
        comparison.annual_savings
    ));
    lines.join("\n")
}
