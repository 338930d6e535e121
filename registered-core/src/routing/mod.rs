//! Restricted routing over the street graph

pub mod calculation;
pub mod dijkstra;
pub mod restricted_graph;
pub mod route_map;

pub use calculation::{IGNORED_PAIRS, IntervalCalculation, should_ignore};
pub use restricted_graph::{MAX_TURN_ANGLE, RestrictedGraph, SAME_POINT_TOLERANCE, bounding_polygon};
pub use route_map::{DEFAULT_COLORS, RouteMap, RoutePolyline};
