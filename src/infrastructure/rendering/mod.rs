mod html_document_renderer;
mod http_document_renderer;
mod renderer_factory;

pub use html_document_renderer::{HtmlDocumentRenderer, render_html};
pub use http_document_renderer::HttpDocumentRenderer;
pub use renderer_factory::{RendererFactory, RendererFactoryError};
