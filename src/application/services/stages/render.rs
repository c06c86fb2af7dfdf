use bytes::Bytes;
use chrono::Utc;

use crate::application::ports::RenderContext;
use crate::domain::{ArtifactName, ArtifactValue, Job, RenderedDocument, StoragePath};

use super::{StageError, StageExecutors, StageOutcome, within};

impl StageExecutors {
    pub(super) async fn render_document(&self, job: &Job) -> Result<StageOutcome, StageError> {
        let statement = job
            .artifacts
            .statement
            .clone()
            .ok_or(StageError::MissingArtifact(ArtifactName::Statement))?;
        let comparison = job
            .artifacts
            .comparison
            .clone()
            .ok_or(StageError::MissingArtifact(ArtifactName::Comparison))?;

        let context = RenderContext {
            merchant: job.input.merchant.clone(),
            statement,
            business_profile: job.artifacts.business_profile.clone().unwrap_or_default(),
            comparison,
            narrative: job.artifacts.narrative.clone(),
            images: job
                .artifacts
                .images
                .as_ref()
                .map(|set| set.images().cloned().collect())
                .unwrap_or_default(),
            generated_at: Utc::now(),
        };

        let rendered = within(
            "document renderer",
            self.settings.timeouts.render,
            self.collaborators.document_renderer.render(&context),
        )
        .await?
        .map_err(|e| StageError::Rendering(e.to_string()))?;

        if rendered.bytes.is_empty() {
            return Err(StageError::Rendering(
                "renderer returned an empty document".to_string(),
            ));
        }

        let path = StoragePath::document(&job.id, &rendered.extension);
        let size_bytes = self
            .collaborators
            .artifact_store
            .put(&path, Bytes::from(rendered.bytes))
            .await?;

        let document = RenderedDocument {
            storage_path: path,
            filename: format!(
                "{}-proposal.{}",
                slugify(&job.input.merchant.business_name),
                rendered.extension
            ),
            content_type: rendered.content_type,
            size_bytes,
        };

        Ok(
            StageOutcome::new(format!("Rendered proposal ({} bytes)", size_bytes))
                .with_artifact(ArtifactValue::RenderedDocument(document)),
        )
    }
}

fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "merchant".to_string()
    } else {
        slug
    }
}
