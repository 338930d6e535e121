use std::fs;
use std::path::Path;

use registered_core::{Error, GraphConfig, OverpassConfig};
use serde::Deserialize;

/// Settings read from the `--config` TOML file. Missing tables keep their
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub overpass: OverpassConfig,
}

impl Config {
    /// Load the file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
            .map_err(|e| Error::InvalidData(format!("invalid config {}: {e}", path.display())))
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
