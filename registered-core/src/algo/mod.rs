pub mod features;
pub mod geometry;
pub mod units;

pub use features::{add_edge_features, add_graph_features};
pub use geometry::{angle_offset, bearing, cut, distance_to_line, initial_bearing, project};
pub use units::{clean_width, parse_speed};
