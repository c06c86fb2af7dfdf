use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::{Deserialize, Serialize};

use super::Environment;
use crate::application::services::{StageSettings, StageTimeouts};
use crate::domain::PricingTerms;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub collaborators: CollaboratorSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers built-in defaults, then `appsettings.{env}.toml`, then `APP_*`
    /// variables (`APP_DATABASE__URL`, `APP_PIPELINE__MAX_CONCURRENT_JOBS`, ...).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_mb: 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub provider: DatabaseProvider,
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::Memory,
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    Memory,
    Local,
    Azure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data/artifacts".to_string(),
            azure_account: None,
            azure_access_key: None,
            azure_container: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorSettings {
    pub statement_parsing: StatementParsingSettings,
    pub enrichment: EnrichmentSettings,
    pub openai: OpenAiSettings,
    pub renderer: RendererSettings,
}

/// PDF statements need Document Intelligence; without credentials only text
/// and CSV uploads can be parsed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementParsingSettings {
    pub doc_intel_endpoint: Option<String>,
    pub doc_intel_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    pub user_agent: String,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("proposal-pipeline/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub image_model: String,
    pub image_size: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            max_tokens: 600,
            temperature: 0.4,
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererProvider {
    Html,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererSettings {
    pub provider: RendererProvider,
    pub url: Option<String>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            provider: RendererProvider::Html,
            url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub max_concurrent_jobs: usize,
    pub queue_capacity: usize,
    pub image_variants: usize,
    pub timeouts: TimeoutSettings,
    pub pricing: PricingTerms,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            queue_capacity: 64,
            image_variants: 3,
            timeouts: TimeoutSettings::default(),
            pricing: PricingTerms::default(),
        }
    }
}

impl PipelineSettings {
    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            pricing: self.pricing,
            image_variants: self.image_variants,
            timeouts: self.timeouts.to_stage_timeouts(),
        }
    }
}

/// Per-call limits in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutSettings {
    pub parse_secs: u64,
    pub enrichment_secs: u64,
    pub narrative_secs: u64,
    pub image_secs: u64,
    pub render_secs: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        let defaults = StageTimeouts::default();
        Self {
            parse_secs: defaults.parse.as_secs(),
            enrichment_secs: defaults.enrichment.as_secs(),
            narrative_secs: defaults.narrative.as_secs(),
            image_secs: defaults.image.as_secs(),
            render_secs: defaults.render.as_secs(),
        }
    }
}

impl TimeoutSettings {
    pub fn to_stage_timeouts(&self) -> StageTimeouts {
        StageTimeouts {
            parse: Duration::from_secs(self.parse_secs),
            enrichment: Duration::from_secs(self.enrichment_secs),
            narrative: Duration::from_secs(self.narrative_secs),
            image: Duration::from_secs(self.image_secs),
            render: Duration::from_secs(self.render_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,proposal_pipeline=debug,tower_http=debug".to_string(),
            json_format: false,
        }
    }
}
