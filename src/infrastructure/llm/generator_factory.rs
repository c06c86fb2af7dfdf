use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{
    ImageGenerator, ImageGeneratorError, NarrativeGenerator, NarrativeGeneratorError,
};
use crate::presentation::config::OpenAiSettings;

use super::openai_image_generator::OpenAiImageGenerator;
use super::openai_narrative_generator::OpenAiNarrativeGenerator;

/// Stands in for the OpenAI generators when no API key is configured.
/// Every call fails, so the pipeline falls back to standard copy and no imagery.
pub struct UnconfiguredGenerator;

const NOT_CONFIGURED: &str = "OpenAI api_key not configured";

#[async_trait]
impl NarrativeGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str, _context: &str) -> Result<String, NarrativeGeneratorError> {
        Err(NarrativeGeneratorError::ApiRequestFailed(NOT_CONFIGURED.to_string()))
    }
}

#[async_trait]
impl ImageGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> Result<Vec<String>, ImageGeneratorError> {
        Err(ImageGeneratorError::ApiRequestFailed(NOT_CONFIGURED.to_string()))
    }
}

pub struct GeneratorFactory;

impl GeneratorFactory {
    pub fn create(
        settings: &OpenAiSettings,
    ) -> (Arc<dyn NarrativeGenerator>, Arc<dyn ImageGenerator>) {
        match settings.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => {
                tracing::info!(
                    chat_model = %settings.chat_model,
                    image_model = %settings.image_model,
                    "Loading OpenAI generators"
                );
                (
                    Arc::new(OpenAiNarrativeGenerator::new(key.to_string(), settings)),
                    Arc::new(OpenAiImageGenerator::new(key.to_string(), settings)),
                )
            }
            None => {
                tracing::warn!("OpenAI api_key not set; proposals use standard narrative and no imagery");
                (Arc::new(UnconfiguredGenerator), Arc::new(UnconfiguredGenerator))
            }
        }
    }
}
