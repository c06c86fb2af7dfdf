use std::sync::Arc;

use crate::application::ports::DocumentRenderer;
use crate::presentation::config::{RendererProvider, RendererSettings};

use super::html_document_renderer::HtmlDocumentRenderer;
use super::http_document_renderer::HttpDocumentRenderer;

#[derive(Debug, thiserror::Error)]
pub enum RendererFactoryError {
    #[error("url is required for the http renderer")]
    MissingUrl,
}

pub struct RendererFactory;

impl RendererFactory {
    pub fn create(settings: &RendererSettings) -> Result<Arc<dyn DocumentRenderer>, RendererFactoryError> {
        match settings.provider {
            RendererProvider::Html => {
                tracing::info!("Using built-in HTML proposal renderer");
                Ok(Arc::new(HtmlDocumentRenderer))
            }
            RendererProvider::Http => {
                let url = settings.url.as_deref().ok_or(RendererFactoryError::MissingUrl)?;
                tracing::info!(url, "Using HTTP PDF rendering service");
                Ok(Arc::new(HttpDocumentRenderer::new(url)))
            }
        }
    }
}
