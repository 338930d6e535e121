//! Where street graphs and turn restrictions come from

use std::fmt;

use geo::Polygon;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::overpass::OverpassResponse;
use crate::Error;
use crate::model::StreetGraph;

/// A named selection of OSM ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryProfile {
    /// Public drivable streets, including service roads
    DriveService,
    /// Private access roads which still allow public service vehicles
    Psv,
    /// Parking lots and aisles
    Parking,
}

impl QueryProfile {
    pub const ALL: [QueryProfile; 3] = [
        QueryProfile::DriveService,
        QueryProfile::Psv,
        QueryProfile::Parking,
    ];

    /// Overpass way filter selecting this profile.
    pub fn filter(self) -> &'static str {
        match self {
            QueryProfile::DriveService => concat!(
                r#"["highway"]["area"!~"yes"]["access"!~"private"]"#,
                r#"["highway"!~"abandoned|bridleway|bus_guideway|construction|corridor|cycleway|"#,
                r#"elevator|escalator|footway|no|path|pedestrian|planned|platform|proposed|"#,
                r#"raceway|razed|steps|track"]"#,
                r#"["motor_vehicle"!~"no"]["motorcar"!~"no"]"#,
                r#"["service"!~"emergency_access|parking|parking_aisle|private"]"#,
            ),
            QueryProfile::Psv => r#"["highway"]["access"="private"]["psv"!~"no"]"#,
            QueryProfile::Parking => r#"["highway"]["service"~"parking|parking_aisle"]"#,
        }
    }
}

impl fmt::Display for QueryProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryProfile::DriveService => "drive_service",
            QueryProfile::Psv => "psv",
            QueryProfile::Parking => "parking",
        };
        f.write_str(name)
    }
}

/// Provider of raw street graphs and turn restriction relations.
pub trait GraphSource {
    /// The street graph for one profile inside the polygon.
    ///
    /// # Errors
    ///
    /// [`Error::NoData`] if the profile has no ways in the polygon; other
    /// errors if the data could not be fetched.
    fn query(&self, polygon: &Polygon<f64>, profile: QueryProfile) -> Result<StreetGraph, Error>;

    /// Areas to query restrictions for, covering the polygon.
    fn restriction_areas(&self, polygon: &Polygon<f64>) -> Vec<Polygon<f64>> {
        vec![polygon.clone()]
    }

    /// Turn restriction relations inside one area.
    ///
    /// # Errors
    ///
    /// Returns an error if the relations could not be fetched.
    fn query_restrictions(&self, area: &Polygon<f64>) -> Result<OverpassResponse, Error>;
}

/// A source serving prebuilt graphs, ignoring the query polygon.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    graphs: HashMap<QueryProfile, StreetGraph>,
    restrictions: OverpassResponse,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_graph(mut self, profile: QueryProfile, graph: StreetGraph) -> Self {
        self.graphs.insert(profile, graph);
        self
    }

    #[must_use]
    pub fn with_restrictions(mut self, restrictions: OverpassResponse) -> Self {
        self.restrictions = restrictions;
        self
    }
}

impl GraphSource for MemorySource {
    fn query(&self, _polygon: &Polygon<f64>, profile: QueryProfile) -> Result<StreetGraph, Error> {
        match self.graphs.get(&profile) {
            Some(graph) if !graph.is_empty() => Ok(graph.clone()),
            _ => Err(Error::NoData(format!("no {profile} graph"))),
        }
    }

    fn query_restrictions(&self, _area: &Polygon<f64>) -> Result<OverpassResponse, Error> {
        Ok(self.restrictions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, Rect, coord};

    #[test]
    fn test_memory_source_missing_profile_is_no_data() {
        let mut graph = StreetGraph::new();
        graph.add_node(1, Point::new(0.0, 0.0));
        let source = MemorySource::new().with_graph(QueryProfile::DriveService, graph);
        let polygon = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 }).to_polygon();

        assert_eq!(
            source
                .query(&polygon, QueryProfile::DriveService)
                .unwrap()
                .node_count(),
            1
        );
        assert!(matches!(
            source.query(&polygon, QueryProfile::Parking),
            Err(Error::NoData(_))
        ));
        assert_eq!(source.restriction_areas(&polygon), vec![polygon.clone()]);
        assert!(source.query_restrictions(&polygon).unwrap().is_empty());
    }

    #[test]
    fn test_profile_names() {
        let profiles: Vec<QueryProfile> =
            serde_json::from_str(r#"["drive_service", "psv", "parking"]"#).unwrap();
        assert_eq!(profiles, QueryProfile::ALL.to_vec());
        assert_eq!(QueryProfile::Psv.to_string(), "psv");
    }
}
