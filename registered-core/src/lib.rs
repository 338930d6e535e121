//! Turn-restriction-aware street routing for estimating the road distance
//! and direction of transit intervals.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{
    GraphConfig, GraphSource, MemorySource, OverpassConfig, OverpassSource, QueryProfile,
    read_intervals,
};
pub use model::{Interval, IntervalStop, IntervalType, Location, Stop, StreetGraph, Weight};
pub use routing::{IntervalCalculation, RestrictedGraph, RouteMap, should_ignore};

/// OSM node ID, or a synthetic ID for a node created by splitting an edge
pub type NodeId = i64;
/// OSM way ID
pub type WayId = i64;
/// Nodes visited by a path, in order
pub type Path = Vec<NodeId>;
