mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment, UnknownEnvironment};
pub use settings::{
    CollaboratorSettings, DatabaseProvider, DatabaseSettings, EnrichmentSettings,
    LoggingSettings, OpenAiSettings, PipelineSettings, RendererProvider, RendererSettings,
    ServerSettings, Settings, StatementParsingSettings, StorageProviderSetting, StorageSettings,
    TimeoutSettings,
};
