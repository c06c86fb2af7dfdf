use crate::domain::{ArtifactName, Job};

use super::{StageError, StageExecutors, StageOutcome};

impl StageExecutors {
    /// Confirms the rendered proposal is retrievable before the job is promoted.
    pub(super) async fn finalize(&self, job: &Job) -> Result<StageOutcome, StageError> {
        let document = job
            .artifacts
            .rendered_document
            .as_ref()
            .ok_or(StageError::MissingArtifact(ArtifactName::RenderedDocument))?;

        let stored_size = self
            .collaborators
            .artifact_store
            .head(&document.storage_path)
            .await?;

        if stored_size != document.size_bytes {
            return Err(StageError::Verification(format!(
                "stored proposal is {} bytes, expected {}",
                stored_size, document.size_bytes
            )));
        }

        Ok(StageOutcome::new("Proposal ready for download"))
    }
}
