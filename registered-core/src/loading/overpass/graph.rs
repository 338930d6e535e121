//! Conversion of Overpass node/way elements into a street graph

use geo::{Distance, Haversine, LineString, Point};
use hashbrown::HashMap;
use log::{debug, warn};

use super::elements::{OsmWay, OverpassResponse};
use crate::model::{StreetEdge, StreetGraph, WayTags};
use crate::{Error, NodeId};

/// Build a directed street graph from the nodes and ways of a response.
///
/// Each pair of consecutive way nodes becomes one edge, or two (one per
/// direction) unless the way is one-way. Ways referring to nodes missing
/// from the response are cut at the gap.
///
/// # Errors
///
/// Returns [`Error::NoData`] if the response contains no usable ways.
pub fn graph_from_elements(response: &OverpassResponse) -> Result<StreetGraph, Error> {
    let positions: HashMap<NodeId, Point<f64>> = response
        .nodes()
        .map(|node| (node.id, Point::new(node.lon, node.lat)))
        .collect();

    let mut graph = StreetGraph::new();
    let mut missing_nodes = 0usize;

    for way in response.ways() {
        let Some(direction) = Oneway::of(way) else {
            continue;
        };
        let tags = way_tags(way);

        for pair in way.nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let (Some(&from_point), Some(&to_point)) = (positions.get(&from), positions.get(&to))
            else {
                missing_nodes += 1;
                continue;
            };
            graph.add_node(from, from_point);
            graph.add_node(to, to_point);

            let length = Haversine.distance(from_point, to_point);
            if direction != Oneway::Reverse {
                let edge = segment(way, &tags, from_point, to_point, length);
                graph.add_edge(from, to, edge)?;
            }
            if direction != Oneway::Forward {
                let edge = segment(way, &tags, to_point, from_point, length);
                graph.add_edge(to, from, edge)?;
            }
        }
    }

    if missing_nodes > 0 {
        warn!("skipped {missing_nodes} way segments with unknown nodes");
    }
    if graph.is_empty() {
        return Err(Error::NoData("no ways in Overpass response".to_string()));
    }
    debug!(
        "built graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn segment(way: &OsmWay, tags: &WayTags, from: Point<f64>, to: Point<f64>, length: f64) -> StreetEdge {
    StreetEdge::new(
        [way.id],
        tags.clone(),
        LineString::from(vec![from.0, to.0]),
        length,
    )
}

fn way_tags(way: &OsmWay) -> WayTags {
    let tag = |key: &str| way.tag(key).map(str::to_string);
    WayTags {
        highway: way
            .tag("highway")
            .map(|highway| highway.split(';').map(|class| class.trim().to_string()).collect())
            .unwrap_or_default(),
        name: tag("name"),
        maxspeed: tag("maxspeed"),
        width: tag("width"),
        maxheight: tag("maxheight"),
        hgv: tag("hgv"),
        service: tag("service"),
        access: tag("access"),
        oneway: tag("oneway"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Oneway {
    Both,
    Forward,
    Reverse,
}

impl Oneway {
    /// Direction(s) a way can be driven in; `None` for ways with fewer than
    /// two nodes.
    fn of(way: &OsmWay) -> Option<Self> {
        if way.nodes.len() < 2 {
            return None;
        }
        let direction = match way.tag("oneway") {
            Some("yes" | "true" | "1") => Oneway::Forward,
            Some("-1" | "reverse") => Oneway::Reverse,
            Some(_) => Oneway::Both,
            None if way.tag("junction") == Some("roundabout") => Oneway::Forward,
            None => Oneway::Both,
        };
        Some(direction)
    }
}
