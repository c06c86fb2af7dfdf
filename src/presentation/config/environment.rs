use std::fmt;
use std::str::FromStr;

/// Variable that selects the deployment profile.
pub const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Deployment profile; picks the optional `appsettings.{profile}` overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {ENVIRONMENT_VAR} '{0}', expected local, test or prod")]
pub struct UnknownEnvironment(pub String);

impl Environment {
    /// Reads `APP_ENVIRONMENT`, falling back to `local` when unset or blank.
    pub fn from_env() -> Result<Self, UnknownEnvironment> {
        Self::resolve(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    pub fn resolve(value: Option<&str>) -> Result<Self, UnknownEnvironment> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value.parse(),
            None => Ok(Self::default()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }

    pub fn settings_file(&self) -> String {
        format!("appsettings.{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
