//! Derived edge attributes: metric widths, imputed speeds, travel times and
//! the cost penalties which steer buses away from unsuitable streets.
//!
//! Everything is recomputed from the raw tags and the measured length, so
//! running the enrichment again (for example over freshly split edges)
//! gives the same result as running it once.

use hashbrown::HashMap;
use log::debug;
use petgraph::stable_graph::EdgeIndex;

use super::geometry::initial_bearing;
use super::units::{clean_width, parse_speed};
use crate::model::{StreetEdge, StreetGraph};

/// Speeds (km/h) assumed for road classes without a posted limit.
pub const HIGHWAY_SPEEDS: [(&str, f64); 9] = [
    ("motorway", 90.0),
    ("trunk", 90.0),
    ("trunk_link", 60.0),
    ("primary", 60.0),
    ("secondary", 50.0),
    ("tertiary", 30.0),
    ("private", 16.0),
    ("service", 16.0),
    ("residential", 16.0),
];

/// Used only when no edge in the batch has a known speed.
const FALLBACK_SPEED_KPH: f64 = 30.0;
const PENALTY: f64 = 1.5;
/// Streets narrower than this (meters) are penalized.
const NARROW_WIDTH_M: f64 = 5.0;
/// Clearance a bus needs, in meters.
const BUS_HEIGHT_M: f64 = 3.7;
/// Added to both costs of an edge a bus must not use. Any path avoiding
/// such edges is cheaper, and paths which cannot avoid them still order by
/// their real cost.
pub const IMPASSABLE: f64 = 1e9;

/// Enrich every edge of the graph.
pub fn add_graph_features(graph: &mut StreetGraph) {
    let edges: Vec<EdgeIndex> = graph.edge_indices().collect();
    add_edge_features(graph, &edges);
}

/// Enrich a subset of edges, such as the halves of a split edge.
///
/// Edges with neither a posted limit nor a listed road class take the mean
/// posted limit of their class in the batch, then any speed they already
/// had, then the mean known speed of the batch.
pub fn add_edge_features(graph: &mut StreetGraph, edges: &[EdgeIndex]) {
    let class_speeds = class_mean_speeds(graph, edges);
    let known_speeds: Vec<f64> = edges
        .iter()
        .filter_map(|&edge| graph.edge(edge))
        .filter_map(|edge| explicit_speed(edge).or_else(|| highway_speed(edge)))
        .collect();
    let mean_speed = mean(&known_speeds).unwrap_or(FALLBACK_SPEED_KPH);

    let mut impassable = 0;
    for &edge in edges {
        let Some(edge) = graph.edge_mut(edge) else {
            continue;
        };
        let class_speed = edge
            .tags
            .highway
            .first()
            .and_then(|class| class_speeds.get(class))
            .copied();
        enrich(edge, class_speed, mean_speed);
        if edge.is_impassable() {
            impassable += 1;
        }
    }
    debug!(
        "added features to {} edges ({impassable} impassable)",
        edges.len()
    );
}

/// Mean posted limit of each road class, keyed by the first `highway` value.
fn class_mean_speeds(graph: &StreetGraph, edges: &[EdgeIndex]) -> HashMap<String, f64> {
    let mut speeds: HashMap<&str, Vec<f64>> = HashMap::new();
    for edge in edges.iter().filter_map(|&edge| graph.edge(edge)) {
        if let (Some(class), Some(speed)) = (edge.tags.highway.first(), explicit_speed(edge)) {
            speeds.entry(class.as_str()).or_default().push(speed);
        }
    }
    speeds
        .into_iter()
        .filter_map(|(class, speeds)| mean(&speeds).map(|speed| (class.to_string(), speed)))
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn explicit_speed(edge: &StreetEdge) -> Option<f64> {
    edge.tags.maxspeed.as_deref().and_then(parse_speed)
}

fn highway_speed(edge: &StreetEdge) -> Option<f64> {
    edge.tags.highway.iter().find_map(|highway| {
        HIGHWAY_SPEEDS
            .iter()
            .find(|(class, _)| class == highway)
            .map(|(_, speed)| *speed)
    })
}

fn enrich(edge: &mut StreetEdge, class_speed: Option<f64>, mean_speed: f64) {
    let width_m = edge.tags.width.as_deref().and_then(clean_width);
    let maxheight_m = edge.tags.maxheight.as_deref().and_then(clean_width);
    let speed_kph = explicit_speed(edge)
        .or_else(|| highway_speed(edge))
        .or(class_speed)
        .or(edge.features.speed_kph)
        .unwrap_or(mean_speed);

    let mut length = edge.measured_length;
    let mut travel_time = length / (speed_kph / 3.6);

    if edge.tags.has_highway("residential") {
        length *= PENALTY;
        travel_time *= PENALTY;
    }
    if width_m.is_some_and(|width| width < NARROW_WIDTH_M) {
        length *= PENALTY;
        travel_time *= PENALTY;
    }
    if maxheight_m.is_some_and(|height| height < BUS_HEIGHT_M)
        || edge.tags.hgv.as_deref() == Some("no")
    {
        length += IMPASSABLE;
        travel_time += IMPASSABLE;
    }

    edge.features.width_m = width_m;
    edge.features.maxheight_m = maxheight_m;
    edge.features.speed_kph = Some(speed_kph);
    edge.features.length = length;
    edge.features.travel_time = travel_time;
    edge.features.bearing = initial_bearing(&edge.geometry);
}
