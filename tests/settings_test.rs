use proposal_pipeline::presentation::config::{
    DatabaseProvider, Environment, RendererProvider, Settings, StorageProviderSetting,
    UnknownEnvironment,
};

#[test]
fn given_default_settings_when_inspected_then_runnable_locally() {
    let settings = Settings::default();

    assert_eq!(settings.database.provider, DatabaseProvider::Memory);
    assert_eq!(settings.storage.provider, StorageProviderSetting::Local);
    assert_eq!(settings.collaborators.renderer.provider, RendererProvider::Html);
    assert!(settings.collaborators.openai.api_key.is_none());
    assert_eq!(settings.pipeline.image_variants, 3);
}

#[test]
fn given_pipeline_settings_when_converted_then_stage_timeouts_match() {
    let settings = Settings::default();

    let stage = settings.pipeline.stage_settings();

    assert_eq!(stage.timeouts.parse.as_secs(), 60);
    assert_eq!(stage.timeouts.enrichment.as_secs(), 10);
    assert_eq!(stage.timeouts.image.as_secs(), 30);
    assert_eq!(stage.image_variants, settings.pipeline.image_variants);
}

#[test]
fn given_no_overrides_when_loading_then_defaults_apply() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.server.port, Settings::default().server.port);
    assert_eq!(settings.pipeline.pricing.markup_bps, 30.0);
}

#[test]
fn given_environment_names_when_parsing_then_known_values_accepted() {
    assert_eq!("PROD".parse::<Environment>(), Ok(Environment::Prod));
    assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
    assert_eq!(
        "staging".parse::<Environment>(),
        Err(UnknownEnvironment("staging".to_string()))
    );
}

#[test]
fn given_unset_or_blank_environment_when_resolving_then_local() {
    assert_eq!(Environment::resolve(None), Ok(Environment::Local));
    assert_eq!(Environment::resolve(Some("  ")), Ok(Environment::Local));
    assert_eq!(Environment::resolve(Some(" production ")), Ok(Environment::Prod));
}

#[test]
fn given_unknown_environment_when_resolving_then_error_names_variable() {
    let err = Environment::resolve(Some("staging")).unwrap_err();

    assert!(err.to_string().contains("APP_ENVIRONMENT"));
    assert!(err.to_string().contains("staging"));
}

#[test]
fn given_environment_when_naming_overlay_then_lowercase_settings_file() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
    assert_eq!(Environment::Test.to_string(), "test");
}
