mod restricted_dijkstra;
mod state;

pub use restricted_dijkstra::{Turn, restricted_dijkstra};
