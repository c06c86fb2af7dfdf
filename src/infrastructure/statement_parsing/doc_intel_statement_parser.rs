use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::Deserialize;

use super::text_statement_parser::parse_statement_text;
use crate::application::ports::{StatementParser, StatementParserError};
use crate::domain::{ContentType, ParsedStatement, SourceDocument};

pub const POLL_TIMEOUT: Duration = Duration::from_secs(55);
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const MAX_BACKOFF: Duration = Duration::from_secs(8);
pub const API_VERSION: &str = "2024-11-30";

/// Extracts PDF statements through Azure Document Intelligence's layout
/// model, then reads pricing figures from the returned markdown.
pub struct DocIntelStatementParser {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DocIntelStatementParser {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn submit(&self, data: &[u8]) -> Result<String, StatementParserError> {
        let body = serde_json::json!({ "base64Source": general_purpose::STANDARD.encode(data) });

        let url = format!(
            "{}/documentintelligence/documentModels/prebuilt-layout:analyze?api-version={}&outputContentFormat=markdown",
            self.endpoint, API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| extraction_failed(format!("submit failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(extraction_failed(format!("submit returned {status}: {text}")));
        }

        response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| extraction_failed("response missing Operation-Location header"))
    }

    async fn poll_until_complete(&self, operation_url: &str) -> Result<String, StatementParserError> {
        let poll = async {
            let mut backoff = INITIAL_BACKOFF;

            loop {
                let response = self
                    .client
                    .get(operation_url)
                    .header("Ocp-Apim-Subscription-Key", &self.api_key)
                    .send()
                    .await
                    .map_err(|e| extraction_failed(format!("poll request failed: {e}")))?;

                if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(backoff.as_secs());
                    tokio::time::sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(extraction_failed(format!("poll returned {status}: {text}")));
                }

                let result: AnalyzeResponse = response
                    .json()
                    .await
                    .map_err(|e| extraction_failed(format!("response parse failed: {e}")))?;

                match result.status.as_str() {
                    "succeeded" => {
                        return Ok(result.analyze_result.map(|r| r.content).unwrap_or_default());
                    }
                    "failed" => return Err(extraction_failed("document analysis failed")),
                    _ => {
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                    }
                }
            }
        };

        tokio::time::timeout(POLL_TIMEOUT, poll)
            .await
            .map_err(|_| {
                extraction_failed(format!(
                    "document analysis polling timed out after {}s",
                    POLL_TIMEOUT.as_secs()
                ))
            })?
    }
}

fn extraction_failed(reason: impl Into<String>) -> StatementParserError {
    StatementParserError::ExtractionFailed(reason.into())
}

#[async_trait]
impl StatementParser for DocIntelStatementParser {
    #[tracing::instrument(skip(self, data), fields(filename = %document.filename))]
    async fn parse(
        &self,
        data: &[u8],
        document: &SourceDocument,
    ) -> Result<ParsedStatement, StatementParserError> {
        if document.content_type != ContentType::Pdf {
            return Err(StatementParserError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let operation_url = self.submit(data).await?;
        let markdown = self.poll_until_complete(&operation_url).await?;

        if markdown.trim().is_empty() {
            return Err(StatementParserError::NoPricingData(document.filename.clone()));
        }

        tracing::debug!(chars = markdown.len(), "Statement layout extracted");
        parse_statement_text(&markdown, &document.filename)
    }
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Deserialize)]
struct AnalyzeResult {
    content: String,
}
