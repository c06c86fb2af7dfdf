use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, Response, Url};

use crate::application::ports::{EnrichmentClient, EnrichmentError};
use crate::domain::{BusinessProfile, ProfileSource};

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static META_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<meta\s[^>]*>").unwrap());
static META_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:property|name)\s*=\s*["']([^"']+)["']"#).unwrap());
static META_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)\bcontent\s*=\s*"([^"]*)"|\bcontent\s*=\s*'([^']*)'"#).unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const MAX_BODY_BYTES: usize = 512 * 1024;

/// Fetches the merchant's home page and reads its title and description
/// metadata.
pub struct WebsiteEnrichmentClient {
    client: Client,
}

impl WebsiteEnrichmentClient {
    pub fn new(user_agent: &str) -> Self {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self { client }
    }
}

#[async_trait]
impl EnrichmentClient for WebsiteEnrichmentClient {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, website: &str) -> Result<BusinessProfile, EnrichmentError> {
        let url = normalize_website(website)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| EnrichmentError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EnrichmentError::RequestFailed(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let body = read_capped(response, MAX_BODY_BYTES).await?;
        let html = String::from_utf8_lossy(&body);

        let profile = extract_profile(&html);
        if profile.source == ProfileSource::Unavailable {
            return Err(EnrichmentError::NothingFound(url.to_string()));
        }

        tracing::debug!(title = ?profile.title, "Website metadata extracted");
        Ok(profile)
    }
}

/// Reads at most `cap` bytes and drops the connection after that.
async fn read_capped(mut response: Response, cap: usize) -> Result<Vec<u8>, EnrichmentError> {
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| EnrichmentError::RequestFailed(e.to_string()))?
    {
        let take = chunk.len().min(cap - body.len());
        body.extend_from_slice(&chunk[..take]);
        if body.len() >= cap {
            break;
        }
    }
    Ok(body)
}

/// Accepts bare domains by assuming https.
pub fn normalize_website(website: &str) -> Result<Url, EnrichmentError> {
    let trimmed = website.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate)
        .map_err(|e| EnrichmentError::InvalidWebsite(format!("{website}: {e}")))?;

    match (url.scheme(), url.host_str()) {
        ("http" | "https", Some(host)) if host.contains('.') || host == "localhost" => Ok(url),
        _ => Err(EnrichmentError::InvalidWebsite(website.to_string())),
    }
}

/// Reads `<title>`, `description`/`og:description` and `og:site_name`.
/// Returns an unavailable profile when the page carries none of them.
pub fn extract_profile(html: &str) -> BusinessProfile {
    let mut title = TITLE.captures(html).and_then(|c| clean_text(&c[1]));
    let mut description = None;
    let mut site_name = None;

    for tag in META_TAG.find_iter(html) {
        let tag = tag.as_str();
        let Some(key) = META_KEY.captures(tag).map(|c| c[1].to_ascii_lowercase()) else {
            continue;
        };
        let Some(content) = META_CONTENT
            .captures(tag)
            .and_then(|c| c.get(1).or(c.get(2)))
            .and_then(|m| clean_text(m.as_str()))
        else {
            continue;
        };

        match key.as_str() {
            "description" | "og:description" => {
                description.get_or_insert(content);
            }
            "og:site_name" => {
                site_name.get_or_insert(content);
            }
            "og:title" if title.is_none() => title = Some(content),
            _ => {}
        }
    }

    let source = if title.is_some() || description.is_some() || site_name.is_some() {
        ProfileSource::Website
    } else {
        ProfileSource::Unavailable
    };

    BusinessProfile {
        title,
        description,
        site_name,
        source,
    }
}

fn clean_text(raw: &str) -> Option<String> {
    let decoded = raw
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ");
    let collapsed = WHITESPACE.replace_all(decoded.trim(), " ").to_string();
    (!collapsed.is_empty()).then_some(collapsed)
}
