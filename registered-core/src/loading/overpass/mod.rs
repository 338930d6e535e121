//! Overpass API access: query text, JSON elements and graph construction

mod client;
mod elements;
mod graph;
pub mod query;

pub use client::OverpassSource;
pub use elements::{Element, Member, OsmNode, OsmRelation, OsmWay, OverpassResponse};
pub use graph::graph_from_elements;
