//! Drivable street network model

pub mod cache;
pub mod components;
pub mod network;

pub use cache::{EdgesCache, NodesCache};
pub use components::{EdgeFeatures, StreetEdge, StreetNode, WayTags, Weight};
pub use network::StreetGraph;
