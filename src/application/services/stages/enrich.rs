use crate::domain::{ArtifactValue, BusinessProfile, Job};

use super::{StageError, StageExecutors, StageOutcome, within};

impl StageExecutors {
    pub(super) async fn enrich_merchant(&self, job: &Job) -> Result<StageOutcome, StageError> {
        let website = job
            .input
            .merchant
            .website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty());

        let Some(website) = website else {
            return Ok(
                StageOutcome::new("No website provided; skipped enrichment").with_artifact(
                    ArtifactValue::BusinessProfile(BusinessProfile::unavailable()),
                ),
            );
        };

        let profile = within(
            "enrichment service",
            self.settings.timeouts.enrichment,
            self.collaborators.enrichment_client.lookup(website),
        )
        .await?
        .map_err(|e| StageError::collaborator("enrichment service", e))?;

        let message = format!(
            "Found business details for {}",
            profile.display_name(website)
        );

        Ok(StageOutcome::new(message).with_artifact(ArtifactValue::BusinessProfile(profile)))
    }
}
