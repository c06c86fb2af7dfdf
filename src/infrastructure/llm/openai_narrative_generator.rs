use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{NarrativeGenerator, NarrativeGeneratorError};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::OpenAiSettings;

const SYSTEM_PROMPT: &str = "You write concise, factual sales copy for payment processing \
proposals. Use only the figures given in the context. Never invent numbers.\n\nContext:\n{context}";

pub struct OpenAiNarrativeGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiNarrativeGenerator {
    pub fn new(api_key: String, settings: &OpenAiSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.chat_model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    fn build_messages(&self, prompt: &str, context: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.replace("{context}", context),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ]
    }
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrativeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        context: &str,
    ) -> Result<String, NarrativeGeneratorError> {
        tracing::debug!(
            model = %self.model,
            prompt = %sanitize_prompt(prompt),
            "Requesting proposal narrative"
        );

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(prompt, context),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| NarrativeGeneratorError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NarrativeGeneratorError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NarrativeGeneratorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| NarrativeGeneratorError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| NarrativeGeneratorError::InvalidResponse("empty choices".to_string()))
    }
}
