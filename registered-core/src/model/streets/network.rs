//! Directed street multigraph with stable indices and external node IDs

use geo::Point;
use hashbrown::HashMap;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;

use super::{StreetEdge, StreetNode};
use crate::{Error, NodeId};

/// Street network graph.
///
/// Parallel edges are allowed. Node and edge indices stay valid when other
/// edges are removed, which lets the graph be split in place while spatial
/// indices keep referring to it.
#[derive(Debug, Clone, Default)]
pub struct StreetGraph {
    pub graph: StableDiGraph<StreetNode, StreetEdge>,
    node_index: HashMap<NodeId, NodeIndex>,
}

impl StreetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Add a node, or return the index of the existing node with this ID.
    pub fn add_node(&mut self, id: NodeId, geometry: Point<f64>) -> NodeIndex {
        if let Some(&index) = self.node_index.get(&id) {
            return index;
        }
        let index = self.graph.add_node(StreetNode { id, geometry });
        self.node_index.insert(id, index);
        index
    }

    /// Add a directed edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is not in the graph.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        edge: StreetEdge,
    ) -> Result<EdgeIndex, Error> {
        let from_index = self.require_node(from)?;
        let to_index = self.require_node(to)?;
        Ok(self.graph.add_edge(from_index, to_index, edge))
    }

    pub fn remove_edge(&mut self, edge: EdgeIndex) -> Option<StreetEdge> {
        self.graph.remove_edge(edge)
    }

    pub fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }

    fn require_node(&self, id: NodeId) -> Result<NodeIndex, Error> {
        self.node_index(id)
            .ok_or_else(|| Error::InvalidData(format!("node {id} is not in the graph")))
    }

    pub fn node_id(&self, index: NodeIndex) -> Option<NodeId> {
        self.graph.node_weight(index).map(|node| node.id)
    }

    pub fn node(&self, id: NodeId) -> Option<&StreetNode> {
        self.node_index(id)
            .and_then(|index| self.graph.node_weight(index))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StreetNode> {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index))
    }

    pub fn max_node_id(&self) -> Option<NodeId> {
        self.node_index.keys().copied().max()
    }

    pub fn edge(&self, edge: EdgeIndex) -> Option<&StreetEdge> {
        self.graph.edge_weight(edge)
    }

    pub fn edge_mut(&mut self, edge: EdgeIndex) -> Option<&mut StreetEdge> {
        self.graph.edge_weight_mut(edge)
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// External IDs of the (head, tail) nodes of an edge.
    pub fn edge_endpoints(&self, edge: EdgeIndex) -> Option<(NodeId, NodeId)> {
        let (from, to) = self.graph.edge_endpoints(edge)?;
        Some((self.node_id(from)?, self.node_id(to)?))
    }

    /// All parallel edges from `from` to `to`, lowest index first.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> Vec<EdgeIndex> {
        let (Some(from_index), Some(to_index)) = (self.node_index(from), self.node_index(to))
        else {
            return Vec::new();
        };
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges(from_index)
            .filter(|edge| edge.target() == to_index)
            .map(|edge| edge.id())
            .collect();
        edges.sort_unstable();
        edges
    }

    /// The first of the parallel edges from `from` to `to`.
    pub fn first_edge_between(&self, from: NodeId, to: NodeId) -> Option<&StreetEdge> {
        self.edges_between(from, to)
            .first()
            .and_then(|&edge| self.edge(edge))
    }

    /// Number of edges entering or leaving the node.
    pub fn degree(&self, id: NodeId) -> usize {
        self.node_index(id).map_or(0, |index| {
            self.graph.edges_directed(index, Direction::Outgoing).count()
                + self.graph.edges_directed(index, Direction::Incoming).count()
        })
    }

    /// Union another graph into this one.
    ///
    /// Nodes are matched by ID; an edge is only added if no edge between the
    /// same endpoints already carries the same way IDs.
    pub fn merge(&mut self, other: &StreetGraph) {
        for node in other.nodes() {
            self.add_node(node.id, node.geometry);
        }

        for edge in other.edge_indices() {
            let (Some((from, to)), Some(weight)) = (other.edge_endpoints(edge), other.edge(edge))
            else {
                continue;
            };
            let duplicate = self.edges_between(from, to).into_iter().any(|existing| {
                self.edge(existing)
                    .is_some_and(|existing| existing.way_ids == weight.way_ids)
            });
            if duplicate {
                continue;
            }
            if let (Some(from_index), Some(to_index)) = (self.node_index(from), self.node_index(to))
            {
                self.graph.add_edge(from_index, to_index, weight.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::streets::WayTags;
    use geo::line_string;

    fn segment(way: i64) -> StreetEdge {
        StreetEdge::new(
            [way],
            WayTags::default(),
            line_string![(x: 0.0, y: 0.0), (x: 0.001, y: 0.0)],
            80.0,
        )
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = StreetGraph::new();
        let first = graph.add_node(7, Point::new(0.0, 0.0));
        let second = graph.add_node(7, Point::new(1.0, 1.0));
        assert_eq!(first, second);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node(7).unwrap().geometry, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_add_edge_requires_nodes() {
        let mut graph = StreetGraph::new();
        graph.add_node(1, Point::new(0.0, 0.0));
        assert!(graph.add_edge(1, 2, segment(10)).is_err());
    }

    #[test]
    fn test_parallel_edges_ordered_by_index() {
        let mut graph = StreetGraph::new();
        graph.add_node(1, Point::new(0.0, 0.0));
        graph.add_node(2, Point::new(0.001, 0.0));
        let first = graph.add_edge(1, 2, segment(10)).unwrap();
        let second = graph.add_edge(1, 2, segment(11)).unwrap();

        assert_eq!(graph.edges_between(1, 2), vec![first, second]);
        assert!(graph.first_edge_between(1, 2).unwrap().way_ids.contains(&10));
        assert!(graph.edges_between(2, 1).is_empty());
        assert_eq!(graph.degree(1), 2);
    }

    #[test]
    fn test_merge_skips_duplicate_ways() {
        let mut graph = StreetGraph::new();
        graph.add_node(1, Point::new(0.0, 0.0));
        graph.add_node(2, Point::new(0.001, 0.0));
        graph.add_edge(1, 2, segment(10)).unwrap();

        let mut other = StreetGraph::new();
        other.add_node(1, Point::new(0.0, 0.0));
        other.add_node(2, Point::new(0.001, 0.0));
        other.add_node(3, Point::new(0.002, 0.0));
        other.add_edge(1, 2, segment(10)).unwrap();
        other.add_edge(2, 3, segment(12)).unwrap();

        graph.merge(&other);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.max_node_id(), Some(3));
    }
}
