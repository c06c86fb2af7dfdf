use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;

use proposal_pipeline::application::ports::{EnrichmentClient, EnrichmentError};
use proposal_pipeline::domain::ProfileSource;
use proposal_pipeline::infrastructure::enrichment::{
    WebsiteEnrichmentClient, extract_profile, normalize_website,
};

#[test]
fn given_page_with_metadata_when_extracting_then_profile_is_populated() {
    let html = r#"<html><head>
        <title>
            Corner Bakery &amp; Cafe | Home
        </title>
        <meta name="description" content="Fresh bread, baked daily since 1998.">
        <meta property="og:site_name" content='Corner Bakery'>
    </head><body></body></html>"#;

    let profile = extract_profile(html);

    assert_eq!(profile.source, ProfileSource::Website);
    assert_eq!(profile.title.as_deref(), Some("Corner Bakery & Cafe | Home"));
    assert_eq!(
        profile.description.as_deref(),
        Some("Fresh bread, baked daily since 1998.")
    );
    assert_eq!(profile.site_name.as_deref(), Some("Corner Bakery"));
    assert_eq!(profile.display_name("fallback"), "Corner Bakery");
}

#[test]
fn given_og_title_only_when_extracting_then_used_as_title() {
    let html = r#"<meta content="Bakery" property="og:title">"#;

    let profile = extract_profile(html);

    assert_eq!(profile.title.as_deref(), Some("Bakery"));
}

#[test]
fn given_page_without_metadata_when_extracting_then_unavailable() {
    let profile = extract_profile("<html><body><p>Hello</p></body></html>");

    assert_eq!(profile.source, ProfileSource::Unavailable);
    assert_eq!(profile.display_name("Corner Bakery"), "Corner Bakery");
}

#[test]
fn given_bare_domain_when_normalizing_then_https_is_assumed() {
    let url = normalize_website("cornerbakery.example").unwrap();

    assert_eq!(url.as_str(), "https://cornerbakery.example/");
}

#[test]
fn given_invalid_website_when_normalizing_then_rejected() {
    assert!(matches!(
        normalize_website("not a website"),
        Err(EnrichmentError::InvalidWebsite(_))
    ));
    assert!(matches!(
        normalize_website("ftp://files.example"),
        Err(EnrichmentError::InvalidWebsite(_))
    ));
}

/// Serves `/head-first` with metadata ahead of a large body and `/tail-only`
/// with its only title past the read limit.
async fn spawn_site() -> String {
    let padding = "x".repeat(2 * 1024 * 1024);
    let head_first = format!(
        "<html><head><title>Corner Bakery</title></head><body>{padding}</body></html>"
    );
    let tail_only = format!("<html><body>{padding}<title>Too Late</title></body></html>");

    let app = Router::new()
        .route("/head-first", get(move || async move { head_first }))
        .route("/tail-only", get(move || async move { tail_only }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn given_large_page_when_looking_up_then_metadata_in_head_is_found() {
    let base = spawn_site().await;
    let client = WebsiteEnrichmentClient::new("proposal-pipeline-test");

    let profile = client.lookup(&format!("{base}/head-first")).await.unwrap();

    assert_eq!(profile.source, ProfileSource::Website);
    assert_eq!(profile.title.as_deref(), Some("Corner Bakery"));
}

#[tokio::test]
async fn given_metadata_past_read_limit_when_looking_up_then_nothing_found() {
    let base = spawn_site().await;
    let client = WebsiteEnrichmentClient::new("proposal-pipeline-test");

    let err = client.lookup(&format!("{base}/tail-only")).await.unwrap_err();

    assert!(matches!(err, EnrichmentError::NothingFound(_)));
}
