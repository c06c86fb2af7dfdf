use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ImageGenerator, ImageGeneratorError};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::OpenAiSettings;

pub struct OpenAiImageGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    size: String,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl OpenAiImageGenerator {
    pub fn new(api_key: String, settings: &OpenAiSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.image_model.clone(),
            size: settings.image_size.clone(),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<String>, ImageGeneratorError> {
        tracing::debug!(model = %self.model, prompt = %sanitize_prompt(prompt), "Requesting image");

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ImageRequest {
                model: &self.model,
                prompt,
                n: 1,
                size: &self.size,
            })
            .send()
            .await
            .map_err(|e| ImageGeneratorError::ApiRequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ImageGeneratorError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body)
                && envelope.error.code.as_deref() == Some("content_policy_violation")
            {
                return Err(ImageGeneratorError::Rejected(envelope.error.message));
            }
            return Err(ImageGeneratorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let images: ImageResponse = response
            .json()
            .await
            .map_err(|e| ImageGeneratorError::InvalidResponse(e.to_string()))?;

        Ok(images.data.into_iter().filter_map(|d| d.url).collect())
    }
}
