mod website_enrichment_client;

pub use website_enrichment_client::{WebsiteEnrichmentClient, extract_profile, normalize_website};
