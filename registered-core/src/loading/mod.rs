//! This module is responsible for loading data from various sources
//! (Overpass, CSV exports) into the street and interval models.

mod config;
mod intervals;
pub mod overpass;
mod restrictions;
mod source;

pub use config::{CACHE_DIR_ENV, GraphConfig, OverpassConfig};
pub use intervals::{IntervalRow, read_intervals, read_intervals_from};
pub use overpass::{OverpassResponse, OverpassSource, graph_from_elements};
pub use restrictions::{osm_relations_to_restrictions, restrictions_in_polygon};
pub use source::{GraphSource, MemorySource, QueryProfile};
