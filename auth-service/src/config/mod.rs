use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub mongodb: MongoConfig,
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

/// Locations of the PEM-encoded token signing key pair.
#[derive(Debug, Clone)]
pub struct KeysConfig {
    pub private_key_path: String,
    pub public_key_path: String,
}

/// Reads variables from a lookup, remembering every one that is missing so
/// startup reports them together.
struct VarReader<F> {
    lookup: F,
    environment: Environment,
    missing: Vec<&'static str>,
}

impl<F> VarReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F, environment: Environment) -> Self {
        Self {
            lookup,
            environment,
            missing: Vec::new(),
        }
    }

    /// Production ignores `dev_default`.
    fn var(&mut self, key: &'static str, dev_default: Option<&str>) -> String {
        let default = match self.environment {
            Environment::Dev => dev_default,
            Environment::Prod => None,
        };

        match ((self.lookup)(key), default) {
            (Some(value), _) => value,
            (None, Some(default)) => default.to_string(),
            (None, None) => {
                self.missing.push(key);
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(AppError::ConfigError(anyhow::anyhow!(
            "Missing {} configuration: {}",
            self.environment.as_str(),
            self.missing.join(", ")
        )))
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the service settings from `lookup`, on top of the shared
    /// `common` settings.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            None => Environment::Dev,
        };

        let mut vars = VarReader::new(lookup, environment);
        let config = AuthConfig {
            common,
            environment,
            service_name: vars.var("SERVICE_NAME", Some("auth-service")),
            service_version: vars.var("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION"))),
            log_level: vars.var("LOG_LEVEL", Some("info")),
            mongodb: MongoConfig {
                uri: vars.var("MONGODB_URI", Some("mongodb://localhost:27017")),
                database: vars.var("MONGODB_DATABASE", Some("auth")),
            },
            keys: KeysConfig {
                private_key_path: vars.var("JWT_PRIVATE_KEY_PATH", None),
                public_key_path: vars.var("JWT_PUBLIC_KEY_PATH", None),
            },
        };
        vars.finish()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.keys.private_key_path.trim().is_empty() || self.keys.public_key_path.trim().is_empty()
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_PRIVATE_KEY_PATH and JWT_PUBLIC_KEY_PATH must not be empty"
            )));
        }

        Ok(())
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => Err(format!("Unknown ENVIRONMENT '{}', expected dev or prod", other)),
        }
    }
}
