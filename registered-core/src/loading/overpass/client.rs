use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use geo::Polygon;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use super::elements::OverpassResponse;
use super::graph::graph_from_elements;
use super::query::{polygon_tiles, restrictions_query, ways_query};
use crate::Error;
use crate::loading::{GraphSource, OverpassConfig, QueryProfile};
use crate::model::StreetGraph;

/// Graph source backed by an Overpass API interpreter.
///
/// Responses are cached on disk by the SHA-256 of the query text, so
/// repeated runs over the same area do not hit the network.
#[derive(Debug, Clone)]
pub struct OverpassSource {
    config: OverpassConfig,
    client: Client,
}

impl OverpassSource {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OverpassConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Run a query, using the cached response if there is one. A cached
    /// response which no longer parses is fetched again and overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not valid
    /// Overpass JSON.
    pub fn request(&self, query: &str) -> Result<OverpassResponse, Error> {
        let cache_path = self.cache_path(query);
        if let Some(path) = &cache_path {
            if let Ok(body) = fs::read_to_string(path) {
                match serde_json::from_str(&body) {
                    Ok(response) => {
                        debug!("using cached response {}", path.display());
                        return Ok(response);
                    }
                    Err(err) => warn!("ignoring unreadable cache {}: {err}", path.display()),
                }
            }
        }

        info!("requesting {}", self.config.endpoint);
        let body = self
            .client
            .post(&self.config.endpoint)
            .form(&[("data", query)])
            .send()?
            .error_for_status()?
            .text()?;
        let response: OverpassResponse = serde_json::from_str(&body)?;
        debug!("received {} elements", response.elements.len());

        if let Some(path) = cache_path {
            if let Err(err) = write_cache(&path, &body) {
                warn!("unable to cache response at {}: {err}", path.display());
            }
        }
        Ok(response)
    }

    fn cache_path(&self, query: &str) -> Option<PathBuf> {
        let dir = self.config.cache_dir.as_ref()?;
        let digest = Sha256::digest(query.as_bytes());
        Some(dir.join(format!("{}.json", hex::encode(digest))))
    }
}

fn write_cache(path: &std::path::Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)
}

impl GraphSource for OverpassSource {
    fn query(&self, polygon: &Polygon<f64>, profile: QueryProfile) -> Result<StreetGraph, Error> {
        let mut graph = StreetGraph::new();
        for tile in polygon_tiles(polygon, self.config.max_tile_degrees) {
            let query = ways_query(profile.filter(), &tile, self.config.timeout_secs);
            match graph_from_elements(&self.request(&query)?) {
                Ok(tile_graph) => graph.merge(&tile_graph),
                Err(Error::NoData(_)) => {}
                Err(err) => return Err(err),
            }
        }

        if graph.is_empty() {
            return Err(Error::NoData(format!("no {profile} ways in polygon")));
        }
        Ok(graph)
    }

    fn restriction_areas(&self, polygon: &Polygon<f64>) -> Vec<Polygon<f64>> {
        polygon_tiles(polygon, self.config.max_tile_degrees)
    }

    fn query_restrictions(&self, area: &Polygon<f64>) -> Result<OverpassResponse, Error> {
        self.request(&restrictions_query(area, self.config.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Rect, coord};

    fn cached_source(dir: &std::path::Path) -> OverpassSource {
        OverpassSource::new(OverpassConfig {
            // unroutable, so any cache miss fails fast
            endpoint: "http://127.0.0.1:9/api/interpreter".to_string(),
            timeout_secs: 1,
            cache_dir: Some(dir.to_path_buf()),
            ..OverpassConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_query_reads_cached_response() {
        let dir = tempfile::tempdir().unwrap();
        let source = cached_source(dir.path());
        let polygon = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.01, y: 0.01 }).to_polygon();

        let query = ways_query(QueryProfile::Parking.filter(), &polygon, 1);
        let path = source.cache_path(&query).unwrap();
        fs::write(
            &path,
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 0.001, "lon": 0.001},
                {"type": "node", "id": 2, "lat": 0.002, "lon": 0.001},
                {"type": "way", "id": 7, "nodes": [1, 2], "tags": {"highway": "service", "service": "parking_aisle"}}
            ]}"#,
        )
        .unwrap();

        let graph = source.query(&polygon, QueryProfile::Parking).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_cached_empty_response_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let source = cached_source(dir.path());
        let polygon = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 0.01, y: 0.01 }).to_polygon();

        let query = ways_query(QueryProfile::Psv.filter(), &polygon, 1);
        fs::write(source.cache_path(&query).unwrap(), r#"{"elements": []}"#).unwrap();

        assert!(matches!(
            source.query(&polygon, QueryProfile::Psv),
            Err(Error::NoData(_))
        ));
    }

    #[test]
    fn test_corrupt_cache_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let source = cached_source(dir.path());
        let path = source.cache_path("[out:json];").unwrap();
        fs::write(&path, r#"{"elements": [{"type": "no"#).unwrap();

        let err = source.request("[out:json];").unwrap_err();

        assert!(matches!(err, Error::Network(_)), "{err:?}");
        assert!(path.exists());
    }

    #[test]
    fn test_cache_key_depends_on_query() {
        let dir = tempfile::tempdir().unwrap();
        let source = cached_source(dir.path());
        assert_ne!(source.cache_path("a"), source.cache_path("b"));
        assert_eq!(source.cache_path("a"), source.cache_path("a"));
    }
}
