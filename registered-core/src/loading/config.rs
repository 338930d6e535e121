use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::QueryProfile;

/// Environment variable naming the Overpass response cache directory.
pub const CACHE_DIR_ENV: &str = "REGISTERED_CACHE_DIR";

/// How the graph around a set of points is assembled.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Padding around the points' bounding box, in degrees
    pub margin: f64,
    /// Sub-graphs to fetch and union
    pub profiles: Vec<QueryProfile>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            margin: 0.02,
            profiles: QueryProfile::ALL.to_vec(),
        }
    }
}

/// Overpass API client settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Raw responses are cached here; `None` disables the cache
    pub cache_dir: Option<PathBuf>,
    /// Larger areas are queried in tiles of at most this size, in degrees
    pub max_tile_degrees: f64,
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        let cache_dir = std::env::var_os(CACHE_DIR_ENV)
            .map_or_else(|| PathBuf::from("./cache"), PathBuf::from);
        Self {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 180,
            cache_dir: Some(cache_dir),
            max_tile_degrees: 0.5,
            user_agent: concat!("registered/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
