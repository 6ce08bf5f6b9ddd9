use crate::conf::{BehaviorConfig, ConnectionConfig};
use crate::core::MasonError;
use config::Config as CConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, MasonError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| MasonError::ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| MasonError::ConfigParsingError(e.to_string()))?;

        return Ok(config);
    }
}
