// Re-export key components
pub use crate::algo::geometry::{angle_offset, bearing, cut};
pub use crate::algo::features::IMPASSABLE;
pub use crate::algo::units::clean_width;
pub use crate::loading::{
    GraphConfig, GraphSource, MemorySource, OverpassConfig, OverpassSource, QueryProfile,
    graph_from_elements, osm_relations_to_restrictions, read_intervals,
};
pub use crate::model::{
    Interval, IntervalStop, IntervalType, Location, Restriction, RestrictionSet, Stop,
    StopWithoutLocation, StreetGraph, Weight,
};
pub use crate::routing::{IntervalCalculation, RestrictedGraph, RouteMap, should_ignore};

// Core types for the street network
pub use crate::Error;
pub use crate::NodeId;
pub use crate::Path;
pub use crate::WayId;
