//! Spatial indices over the street graph's nodes and edges.
//!
//! Both caches are kept in step with the graph as edges are split: new
//! entries are inserted into the existing R-trees, which are never rebuilt.

use geo::{BoundingRect, LineString, Point};
use petgraph::stable_graph::EdgeIndex;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Rectangle};
use strsim::normalized_levenshtein;

use super::{StreetEdge, StreetGraph};
use crate::NodeId;
use crate::algo::geometry::{angle_offset, bearing, distance_to_line};
use crate::model::Location;

/// Number of candidate edges pulled from the R-tree for each query.
pub const NEAREST_EDGE_CANDIDATES: usize = 4;
/// Candidates within this distance of the best one are considered tied.
const TIE_EPSILON: f64 = 1e-6;
/// Snapping onto a motorway is only preferred if it is this many times closer.
const MOTORWAY_BIAS: f64 = 3.0;

type NodeEntry = GeomWithData<[f64; 2], NodeId>;
type EdgeEntry = GeomWithData<Rectangle<[f64; 2]>, EdgeIndex>;

/// Node positions, plus the allocator for synthetic node IDs.
#[derive(Debug, Clone)]
pub struct NodesCache {
    next_id: NodeId,
    index: RTree<NodeEntry>,
}

impl NodesCache {
    pub fn new(graph: &StreetGraph) -> Self {
        let entries = graph
            .nodes()
            .map(|node| NodeEntry::new([node.geometry.x(), node.geometry.y()], node.id))
            .collect();
        Self {
            next_id: graph.max_node_id().map_or(0, |max| max + 1),
            index: RTree::bulk_load(entries),
        }
    }

    /// A new ID which no existing (or previously allocated) node uses.
    pub fn new_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The closest node to `point`, with its position.
    pub fn nearest(&self, point: Point<f64>) -> Option<(NodeId, Point<f64>)> {
        self.index
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|entry| {
                let [x, y] = *entry.geom();
                (entry.data, Point::new(x, y))
            })
    }

    pub fn insert(&mut self, id: NodeId, point: Point<f64>) {
        self.index.insert(NodeEntry::new([point.x(), point.y()], id));
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }
}

/// Edge bounding boxes, for nearest-edge queries.
#[derive(Debug, Clone)]
pub struct EdgesCache {
    index: RTree<EdgeEntry>,
}

impl EdgesCache {
    pub fn new(graph: &StreetGraph) -> Self {
        let entries = graph
            .edge_indices()
            .filter_map(|edge| edge_entry(graph, edge))
            .collect();
        Self {
            index: RTree::bulk_load(entries),
        }
    }

    pub fn geometry<'g>(&self, graph: &'g StreetGraph, edge: EdgeIndex) -> Option<&'g LineString<f64>> {
        graph.edge(edge).map(|edge| &edge.geometry)
    }

    /// Index edges which were added to the graph after the cache was built.
    pub fn update(&mut self, graph: &StreetGraph, edges: &[EdgeIndex]) {
        for &edge in edges {
            if let Some(entry) = edge_entry(graph, edge) {
                self.index.insert(entry);
            }
        }
    }

    /// Drop an edge from the index. Must be called before the edge is
    /// removed from the graph, while its geometry is still available.
    pub fn remove(&mut self, graph: &StreetGraph, edge: EdgeIndex) {
        if let Some(entry) = edge_entry(graph, edge) {
            self.index.remove(&entry);
        }
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    /// The nearest edges to a location.
    ///
    /// Distances are biased against motorways and, when the location has a
    /// description, towards streets with a similar name. If several edges
    /// are equally close and they are all service roads, all of them are
    /// returned; otherwise the one with the point on its right-hand side wins.
    pub fn nearest_edges(&self, graph: &StreetGraph, location: Location<'_>) -> Vec<EdgeIndex> {
        let point = location.point;
        let candidates: Vec<(EdgeIndex, &StreetEdge)> = self
            .index
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .take(NEAREST_EDGE_CANDIDATES)
            .filter_map(|entry| graph.edge(entry.data).map(|edge| (entry.data, edge)))
            .collect();

        let mut distances: Vec<f64> = candidates
            .iter()
            .map(|(_, edge)| {
                let distance = distance_to_line(&edge.geometry, point);
                if edge.tags.highway_starts_with("motorway") {
                    distance * MOTORWAY_BIAS
                } else {
                    distance
                }
            })
            .collect();

        if let Some(description) = location.description {
            bias_by_name(&candidates, &mut distances, description);
        }

        let min_distance = distances.iter().copied().fold(f64::INFINITY, f64::min) + TIE_EPSILON;
        let within_distance: Vec<(EdgeIndex, &StreetEdge)> = candidates
            .into_iter()
            .zip(&distances)
            .filter(|(_, distance)| **distance <= min_distance)
            .map(|(candidate, _)| candidate)
            .collect();

        if within_distance.len() < 2 {
            return within_distance.into_iter().map(|(edge, _)| edge).collect();
        }

        if within_distance
            .iter()
            .all(|(_, edge)| edge.tags.only_highway("service"))
        {
            // service roads can be entered from either side
            return within_distance.into_iter().map(|(edge, _)| edge).collect();
        }

        within_distance
            .into_iter()
            .map(|(index, edge)| (index, right_hand_offset(edge, point)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| vec![index])
            .unwrap_or_default()
    }
}

fn edge_entry(graph: &StreetGraph, edge: EdgeIndex) -> Option<EdgeEntry> {
    let rect = graph.edge(edge)?.geometry.bounding_rect()?;
    Some(EdgeEntry::new(
        Rectangle::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        edge,
    ))
}

/// Divide each distance by the similarity between the description and the
/// street name. Unnamed streets get the mean similarity of the named ones.
fn bias_by_name(candidates: &[(EdgeIndex, &StreetEdge)], distances: &mut [f64], description: &str) {
    let ratios: Vec<Option<f64>> = candidates
        .iter()
        .map(|(_, edge)| {
            edge.tags
                .name
                .as_deref()
                .map(|name| normalized_levenshtein(description, name))
        })
        .collect();

    let known: Vec<f64> = ratios.iter().flatten().copied().collect();
    if known.is_empty() {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = known.iter().sum::<f64>() / known.len() as f64;

    for (distance, ratio) in distances.iter_mut().zip(ratios) {
        *distance /= ratio.unwrap_or(mean);
    }
}

/// How far to the right of the edge's initial heading the point lies.
/// Positive offsets are on the right-hand side.
fn right_hand_offset(edge: &StreetEdge, point: Point<f64>) -> f64 {
    let (Some(edge_bearing), Some(start)) = (edge.bearing(), edge.geometry.0.first()) else {
        return f64::NEG_INFINITY;
    };
    angle_offset(edge_bearing, bearing((*start).into(), point))
}
