use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

/// Settings shared by every service binary.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// `.env`, then an optional `configuration.*` file, then `APP__*`
    /// variables; later sources win.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::load_from("configuration")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, AppError> {
        let settings = Cfg::builder()
            .add_source(File::with_name(file_stem).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults_without_sources() {
        let config = Config::load_from("does-not-exist").expect("missing file is optional");
        assert_eq!(config.port, 8080);
    }
}
