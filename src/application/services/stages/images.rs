use futures::future::join_all;

use crate::domain::{
    ArtifactValue, GeneratedImage, ImageGenerationStatus, ImageOutcome, ImageSet, Job,
    MerchantProfile,
};

use super::{StageError, StageExecutors, StageOutcome};

const VARIANT_STYLES: [(&str, &str); 3] = [
    (
        "cover",
        "A clean, modern cover illustration for a payment processing proposal",
    ),
    (
        "storefront",
        "A welcoming storefront scene with a contactless card terminal at checkout",
    ),
    (
        "growth",
        "An abstract illustration of business growth and savings, soft gradients",
    ),
];

impl StageExecutors {
    /// Issues every variant concurrently; each call carries its own timeout.
    pub(super) async fn generate_images(&self, job: &Job) -> Result<StageOutcome, StageError> {
        if !job.input.options.include_images {
            return Ok(StageOutcome::new("Imagery not requested; skipped"));
        }

        let prompts = variant_prompts(&job.input.merchant, self.settings.image_variants);
        let requested = prompts.len();
        let generator = &self.collaborators.image_generator;
        let limit = self.settings.timeouts.image;

        let calls = prompts.into_iter().map(|(variant, prompt)| async move {
            match tokio::time::timeout(limit, generator.generate(&prompt)).await {
                Ok(Ok(urls)) => ImageOutcome::Generated {
                    images: urls
                        .into_iter()
                        .map(|url| GeneratedImage {
                            variant: variant.clone(),
                            url,
                        })
                        .collect(),
                    variant,
                },
                Ok(Err(e)) => {
                    tracing::warn!(variant = %variant, error = %e, "Image variant failed");
                    ImageOutcome::Failed {
                        variant,
                        reason: e.to_string(),
                    }
                }
                Err(_) => {
                    tracing::warn!(variant = %variant, "Image variant timed out");
                    ImageOutcome::TimedOut {
                        variant,
                        after_ms: limit.as_millis() as u64,
                    }
                }
            }
        });

        let set = ImageSet::from_outcomes(join_all(calls).await);
        let succeeded = set.outcomes.iter().filter(|o| o.is_success()).count();

        match set.status {
            ImageGenerationStatus::Complete => Ok(StageOutcome::new(format!(
                "Generated {} image variant(s)",
                succeeded
            ))
            .with_artifact(ArtifactValue::Images(set))),
            ImageGenerationStatus::Partial => Ok(StageOutcome::new(format!(
                "Generated {} of {} image variants (partial)",
                succeeded, requested
            ))
            .with_artifact(ArtifactValue::Images(set))),
            ImageGenerationStatus::Failed => {
                let reasons: Vec<String> = set
                    .outcomes
                    .iter()
                    .map(|o| match o {
                        ImageOutcome::Failed { variant, reason } => {
                            format!("{}: {}", variant, reason)
                        }
                        ImageOutcome::TimedOut {
                            variant,
                            after_ms,
                        } => format!("{}: timed out after {}ms", variant, after_ms),
                        ImageOutcome::Generated { variant, .. } => variant.clone(),
                    })
                    .collect();
                Err(StageError::collaborator(
                    "image generator",
                    format!("no variant succeeded ({})", reasons.join("; ")),
                ))
            }
        }
    }
}

fn variant_prompts(merchant: &MerchantProfile, count: usize) -> Vec<(String, String)> {
    let subject = match &merchant.industry {
        Some(industry) => format!("{} ({})", merchant.business_name, industry),
        None => merchant.business_name.clone(),
    };

    (0..count)
        .map(|i| {
            let (style, description) = VARIANT_STYLES[i % VARIANT_STYLES.len()];
            let variant = if i < VARIANT_STYLES.len() {
                style.to_string()
            } else {
                format!("{}-{}", style, i / VARIANT_STYLES.len() + 1)
            };
            (variant, format!("{} for {}", description, subject))
        })
        .collect()
}
