use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the URLs of the generated images; an empty list is a valid answer.
    async fn generate(&self, prompt: &str) -> Result<Vec<String>, ImageGeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageGeneratorError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("content policy rejected prompt: {0}")]
    Rejected(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
