use chrono::{TimeZone, Utc};

use proposal_pipeline::application::ports::{DocumentRenderer, RenderContext};
use proposal_pipeline::domain::{
    BusinessProfile, ComparisonData, GeneratedImage, MerchantProfile, Narrative, ParsedStatement,
    PricingTerms,
};
use proposal_pipeline::infrastructure::rendering::{
    HtmlDocumentRenderer, RendererFactory, RendererFactoryError,
};
use proposal_pipeline::presentation::config::{RendererProvider, RendererSettings};

fn render_context(narrative: Option<Narrative>) -> RenderContext {
    let statement = ParsedStatement {
        processor: Some("Acme <Payments>".to_string()),
        total_volume: 1_234_567.0,
        transaction_count: 20_000,
        total_fees: 40_000.0,
        ..ParsedStatement::default()
    };
    let comparison = ComparisonData::compute(&statement, &PricingTerms::default()).unwrap();

    RenderContext {
        merchant: MerchantProfile {
            business_name: "Tom & Jerry's Deli".to_string(),
            website: None,
            industry: None,
            contact_name: Some("Sam Rivera".to_string()),
        },
        statement,
        business_profile: BusinessProfile::unavailable(),
        comparison,
        narrative,
        images: vec![GeneratedImage {
            variant: "cover-1".to_string(),
            url: "https://images.test/cover.png".to_string(),
        }],
        generated_at: Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn given_context_when_rendering_html_then_document_contains_escaped_figures() {
    let rendered = HtmlDocumentRenderer
        .render(&render_context(Some(Narrative::generated(
            "First paragraph.\n\nSecond <paragraph>.".to_string(),
        ))))
        .await
        .unwrap();

    assert_eq!(rendered.extension, "html");
    assert!(rendered.content_type.starts_with("text/html"));
    let html = String::from_utf8(rendered.bytes).unwrap();
    assert!(html.contains("Tom &amp; Jerry&#39;s Deli"));
    assert!(html.contains("Acme &lt;Payments&gt;"));
    assert!(html.contains("$1,234,567.00"));
    assert!(html.contains("<p>Second &lt;paragraph&gt;.</p>"));
    assert!(html.contains("https://images.test/cover.png"));
    assert!(html.contains("March 5, 2025"));
    assert!(html.contains("Estimated savings"));
}

#[tokio::test]
async fn given_no_narrative_when_rendering_html_then_summary_section_is_omitted() {
    let rendered = HtmlDocumentRenderer.render(&render_context(None)).await.unwrap();

    let html = String::from_utf8(rendered.bytes).unwrap();
    assert!(!html.contains("<h2>Summary</h2>"));
}

#[test]
fn given_http_provider_without_url_when_creating_then_missing_url() {
    let settings = RendererSettings {
        provider: RendererProvider::Http,
        url: None,
    };

    assert!(matches!(
        RendererFactory::create(&settings),
        Err(RendererFactoryError::MissingUrl)
    ));
}
