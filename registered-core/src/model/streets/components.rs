//! Street network components - nodes, edges and their derived features

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

use crate::algo::features::IMPASSABLE;
use crate::{Error, NodeId, WayId};

/// Street graph node
#[derive(Debug, Clone, PartialEq)]
pub struct StreetNode {
    /// OSM ID of the node, or a synthetic ID for a node created by splitting
    pub id: NodeId,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Raw OSM way tags relevant to routing a bus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WayTags {
    /// Road classifications (`highway=*`)
    pub highway: Vec<String>,
    pub name: Option<String>,
    pub maxspeed: Option<String>,
    pub width: Option<String>,
    pub maxheight: Option<String>,
    pub hgv: Option<String>,
    pub service: Option<String>,
    pub access: Option<String>,
    pub oneway: Option<String>,
}

impl WayTags {
    pub fn has_highway(&self, class: &str) -> bool {
        self.highway.iter().any(|highway| highway == class)
    }

    pub fn highway_starts_with(&self, prefix: &str) -> bool {
        self.highway.iter().any(|highway| highway.starts_with(prefix))
    }

    /// True if every classification is `class` (and there is at least one).
    pub fn only_highway(&self, class: &str) -> bool {
        !self.highway.is_empty() && self.highway.iter().all(|highway| highway == class)
    }
}

/// Values derived from the raw tags by feature enrichment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeFeatures {
    /// Declared width in meters
    pub width_m: Option<f64>,
    /// Declared maximum height in meters
    pub maxheight_m: Option<f64>,
    /// Explicit or imputed speed
    pub speed_kph: Option<f64>,
    /// Travel time in seconds, after penalties
    pub travel_time: f64,
    /// Length in meters, after penalties
    pub length: f64,
    /// Heading at the start of the edge, in degrees
    pub bearing: Option<f64>,
}

/// Street graph edge (street segment)
#[derive(Debug, Clone, PartialEq)]
pub struct StreetEdge {
    /// OSM ways this segment belongs to
    pub way_ids: BTreeSet<WayId>,
    pub tags: WayTags,
    pub geometry: LineString<f64>,
    /// Surveyed length in meters, never penalized
    pub measured_length: f64,
    pub features: EdgeFeatures,
}

impl StreetEdge {
    pub fn new(
        way_ids: impl IntoIterator<Item = WayId>,
        tags: WayTags,
        geometry: LineString<f64>,
        measured_length: f64,
    ) -> Self {
        Self {
            way_ids: way_ids.into_iter().collect(),
            tags,
            geometry,
            measured_length,
            features: EdgeFeatures {
                length: measured_length,
                ..EdgeFeatures::default()
            },
        }
    }

    /// Cost of traversing this edge under the given weight.
    pub fn cost(&self, weight: Weight) -> f64 {
        match weight {
            Weight::TravelTime => self.features.travel_time,
            Weight::Length => self.features.length,
        }
    }

    pub fn length(&self) -> f64 {
        self.features.length
    }

    pub fn bearing(&self) -> Option<f64> {
        self.features.bearing
    }

    /// True if enrichment marked the edge as unusable by a bus.
    pub fn is_impassable(&self) -> bool {
        self.features.length >= IMPASSABLE
    }
}

/// Edge attribute minimized by a shortest-path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    /// Fastest path
    #[default]
    TravelTime,
    /// Shortest path
    Length,
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::TravelTime => write!(f, "travel_time"),
            Weight::Length => write!(f, "length"),
        }
    }
}

impl FromStr for Weight {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "travel_time" => Ok(Weight::TravelTime),
            "length" => Ok(Weight::Length),
            other => Err(Error::InvalidData(format!("unknown weight {other:?}"))),
        }
    }
}
