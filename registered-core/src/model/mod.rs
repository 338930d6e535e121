//! Data model for restricted street routing
//!
//! Contains the street graph, turn restrictions and the interval/stop types
//! the graph is queried for.

pub mod intervals;
pub mod location;
pub mod restrictions;
pub mod streets;

pub use intervals::{Interval, IntervalStop, IntervalType, Stop, StopWithoutLocation};
pub use location::Location;
pub use restrictions::{Restriction, RestrictionSet};
pub use streets::{
    EdgeFeatures, EdgesCache, NodesCache, StreetEdge, StreetGraph, StreetNode, WayTags, Weight,
};
