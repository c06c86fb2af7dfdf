use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::application::ports::{DocumentRenderer, DocumentRendererError, RenderContext, RenderedBytes};

/// Posts the render context as JSON to an external rendering service that
/// answers with PDF bytes.
pub struct HttpDocumentRenderer {
    client: Client,
    url: String,
}

impl HttpDocumentRenderer {
    pub fn new(url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl DocumentRenderer for HttpDocumentRenderer {
    #[tracing::instrument(skip(self, context), fields(merchant = %context.merchant.business_name))]
    async fn render(&self, context: &RenderContext) -> Result<RenderedBytes, DocumentRendererError> {
        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/pdf")
            .json(context)
            .send()
            .await
            .map_err(|e| DocumentRendererError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocumentRendererError::ServiceError {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/pdf")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DocumentRendererError::RequestFailed(e.to_string()))?;

        if bytes.is_empty() {
            return Err(DocumentRendererError::EmptyDocument);
        }

        Ok(RenderedBytes {
            bytes: bytes.to_vec(),
            content_type,
            extension: "pdf".to_string(),
        })
    }
}
