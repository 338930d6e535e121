#![allow(dead_code)]

use registered_core::loading::{OverpassResponse, graph_from_elements};
use registered_core::prelude::*;
use serde_json::{Value, json};

/// Grid spacing in degrees (about 111 m at the equator).
pub const SPACING: f64 = 0.001;

pub fn response(elements: Value) -> OverpassResponse {
    serde_json::from_value(json!({ "elements": elements })).unwrap()
}

pub fn graph(elements: Value) -> StreetGraph {
    graph_from_elements(&response(elements)).unwrap()
}

/// A 3x3 grid of two-way secondary streets:
///
/// ```text
/// 7 - 8 - 9
/// |   |   |
/// 4 - 5 - 6
/// |   |   |
/// 1 - 2 - 3
/// ```
///
/// Rows are ways 100-102 (south to north), columns 200-202 (west to east).
pub fn grid_elements() -> Value {
    let mut elements = Vec::new();
    for row in 0..3 {
        for column in 0..3 {
            elements.push(json!({
                "type": "node",
                "id": row * 3 + column + 1,
                "lat": f64::from(row) * SPACING,
                "lon": f64::from(column) * SPACING,
            }));
        }
    }
    for i in 0..3 {
        let row: Vec<i32> = (0..3).map(|column| i * 3 + column + 1).collect();
        let column: Vec<i32> = (0..3).map(|row| row * 3 + i + 1).collect();
        elements.push(json!({
            "type": "way", "id": 100 + i, "nodes": row,
            "tags": {"highway": "secondary", "name": format!("Row {i}")}
        }));
        elements.push(json!({
            "type": "way", "id": 200 + i, "nodes": column,
            "tags": {"highway": "secondary", "name": format!("Column {i}")}
        }));
    }
    Value::Array(elements)
}

pub fn grid_source() -> MemorySource {
    MemorySource::new().with_graph(QueryProfile::DriveService, graph(grid_elements()))
}

/// A `no_left_turn` relation.
pub fn restriction(id: i64, from: i64, via: i64, to: i64) -> Value {
    json!({
        "type": "relation",
        "id": id,
        "members": [
            {"type": "way", "ref": from, "role": "from"},
            {"type": "node", "ref": via, "role": "via"},
            {"type": "way", "ref": to, "role": "to"}
        ],
        "tags": {"type": "restriction", "restriction": "no_left_turn"}
    })
}

pub fn grid_points() -> Vec<geo::Point<f64>> {
    vec![
        geo::Point::new(0.0, 0.0),
        geo::Point::new(2.0 * SPACING, 2.0 * SPACING),
    ]
}

/// True if any two consecutive steps of the path turn back on themselves.
pub fn has_reversal(graph: &RestrictedGraph, path: &[NodeId]) -> bool {
    if path.windows(3).any(|nodes| nodes[0] == nodes[2]) {
        return true;
    }
    path.windows(3).any(|nodes| {
        let streets = graph.graph();
        let (Some(from), Some(to)) = (
            streets.first_edge_between(nodes[0], nodes[1]),
            streets.first_edge_between(nodes[1], nodes[2]),
        ) else {
            return false;
        };
        match (from.bearing(), to.bearing()) {
            (Some(a), Some(b)) => angle_offset(a, b).abs() > 135.0,
            _ => false,
        }
    })
}
