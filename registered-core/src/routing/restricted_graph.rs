//! Street graph with turn restrictions, snapping of arbitrary points and
//! restricted shortest paths.

use geo::{BoundingRect, Coord, Distance, Euclidean, LineLocatePoint, MultiPoint, Point, Polygon, Rect};
use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, info};
use petgraph::stable_graph::EdgeIndex;

use super::dijkstra::{Turn, restricted_dijkstra};
use super::route_map::RouteMap;
use crate::algo::features::{add_edge_features, add_graph_features};
use crate::algo::geometry::{angle_offset, cut, project};
use crate::loading::{GraphConfig, GraphSource, restrictions_in_polygon};
use crate::model::{
    EdgesCache, Location, NodesCache, RestrictionSet, StreetEdge, StreetGraph, Weight,
};
use crate::{Error, NodeId, Path};

/// Turns sharper than this (in degrees, either way) are treated as U-turns.
pub const MAX_TURN_ANGLE: f64 = 135.0;
/// Points this close (in degrees) to a connected node, or projecting this
/// close to an end of their nearest edge, snap to that node instead of
/// splitting an edge.
pub const SAME_POINT_TOLERANCE: f64 = 1e-7;

/// A street graph scoped to a set of points, with turn restrictions.
///
/// Points are snapped onto the graph by splitting the nearest edge, so the
/// graph is modified as paths are requested. An instance should serve one
/// set of points and must not be shared between concurrent callers.
#[derive(Debug, Clone)]
pub struct RestrictedGraph {
    graph: StreetGraph,
    restrictions: RestrictionSet,
    nodes_cache: NodesCache,
    edges_cache: EdgesCache,
    created_nodes: HashMap<(u64, u64), NodeId>,
}

impl RestrictedGraph {
    /// Wrap an already enriched graph.
    pub fn new(graph: StreetGraph, restrictions: RestrictionSet) -> Self {
        let nodes_cache = NodesCache::new(&graph);
        let edges_cache = EdgesCache::new(&graph);
        Self {
            graph,
            restrictions,
            nodes_cache,
            edges_cache,
            created_nodes: HashMap::new(),
        }
    }

    /// Build a graph covering the given points, using the default
    /// [`GraphConfig`].
    ///
    /// # Errors
    ///
    /// See [`RestrictedGraph::from_points_with_config`].
    pub fn from_points(source: &impl GraphSource, points: &[Point<f64>]) -> Result<Self, Error> {
        Self::from_points_with_config(source, points, &GraphConfig::default())
    }

    /// Build a graph covering the given points.
    ///
    /// The bounding box of the points, padded by the configured margin, is
    /// queried once per profile and the results are merged. Profiles with
    /// no data are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyGraph`] if there are no points or no profile returned
    /// any streets; any other error from the source.
    pub fn from_points_with_config(
        source: &impl GraphSource,
        points: &[Point<f64>],
        config: &GraphConfig,
    ) -> Result<Self, Error> {
        let polygon = bounding_polygon(points, config.margin)
            .ok_or_else(|| Error::EmptyGraph("unable to build graph with no points".to_string()))?;

        let mut graph = StreetGraph::new();
        for &profile in &config.profiles {
            info!("fetching {profile} graph");
            match source.query(&polygon, profile) {
                Ok(profile_graph) => graph.merge(&profile_graph),
                Err(Error::NoData(reason)) => debug!("no {profile} graph: {reason}"),
                Err(err) => return Err(err),
            }
        }

        if graph.is_empty() {
            return Err(Error::EmptyGraph(format!(
                "unable to build graph from {:?}",
                polygon.bounding_rect()
            )));
        }

        info!("fetching restrictions");
        let restrictions = restrictions_in_polygon(source, &polygon)?;

        info!(
            "adding graph features to {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        add_graph_features(&mut graph);

        Ok(Self::new(graph, restrictions))
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }

    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    /// The cheapest allowed path between two points, or `None` if there is
    /// no such path.
    ///
    /// # Errors
    ///
    /// Returns an error if either point cannot be snapped onto the graph.
    pub fn shortest_path<'a>(
        &mut self,
        from: impl Into<Location<'a>>,
        to: impl Into<Location<'a>>,
        weight: Weight,
    ) -> Result<Option<Path>, Error> {
        let origin = self.closest_node(from)?;
        let destination = self.closest_node(to)?;

        let (Some(start), Some(target)) = (
            self.graph.node_index(origin),
            self.graph.node_index(destination),
        ) else {
            return Ok(None);
        };

        let found = restricted_dijkstra(&self.graph, start, target, weight, |turn: &Turn<'_>| {
            self.restricted(turn.origin, turn.via, turn.dest, turn.from, turn.to)
        });

        Ok(found.map(|(cost, path)| {
            debug!(
                "{weight} path {origin} -> {destination}: {} nodes, cost {cost:.1}",
                path.len()
            );
            path.into_iter()
                .filter_map(|node| self.graph.node_id(node))
                .collect()
        }))
    }

    /// The node a point resolves to, splitting the nearest edge(s) if no
    /// connected node is already at the point.
    ///
    /// Results are remembered per coordinate, so asking again never splits
    /// again.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph has no edges to snap to.
    pub fn closest_node<'a>(&mut self, location: impl Into<Location<'a>>) -> Result<NodeId, Error> {
        let location = location.into();
        if let Some(&node) = self.created_nodes.get(&location.key()) {
            return Ok(node);
        }

        let node = self.snap(location)?;
        self.created_nodes.insert(location.key(), node);
        Ok(node)
    }

    fn snap(&mut self, location: Location<'_>) -> Result<NodeId, Error> {
        let point = location.point;
        if let Some(node) = self.existing_node_at(point) {
            debug!("reusing node {node} at {point:?}");
            return Ok(node);
        }

        debug!("finding closest edge to {point:?}");
        let nearest_edges = self.edges_cache.nearest_edges(&self.graph, location);
        let snapped = nearest_edges
            .first()
            .and_then(|&edge| self.edges_cache.geometry(&self.graph, edge))
            .and_then(|geometry| project(geometry, point))
            .ok_or_else(|| Error::EmptyGraph(format!("no edge to snap {point:?} to")))?;

        if let Some(node) = nearest_edges
            .first()
            .and_then(|&edge| self.endpoint_at(edge, snapped))
        {
            debug!("snapping {point:?} to existing node {node}");
            return Ok(node);
        }

        let node = self.nodes_cache.new_id();
        debug!("snapping {point:?} to {snapped:?}, creating new node {node}");
        for edge in nearest_edges {
            self.split_edge_at_point(edge, node, snapped)?;
        }
        Ok(node)
    }

    fn existing_node_at(&self, point: Point<f64>) -> Option<NodeId> {
        let (node, position) = self.nodes_cache.nearest(point)?;
        (Euclidean.distance(position, point) <= SAME_POINT_TOLERANCE
            && self.graph.degree(node) > 0)
            .then_some(node)
    }

    /// The end of `edge` at `point`, if the point is on one of its ends.
    fn endpoint_at(&self, edge: EdgeIndex, point: Point<f64>) -> Option<NodeId> {
        let (head, tail) = self.graph.edge_endpoints(edge)?;
        [head, tail].into_iter().find(|&node| {
            self.graph.node(node).is_some_and(|node| {
                Euclidean.distance(node.geometry, point) <= SAME_POINT_TOLERANCE
            })
        })
    }

    /// Replace an edge with two edges meeting at a new node on it.
    ///
    /// The halves share the original's tags and ways; lengths are divided
    /// by where the point projects onto the edge, and the features are
    /// recomputed. Returns the (head, tail) halves.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge does not exist or has no length.
    pub fn split_edge_at_point(
        &mut self,
        edge: EdgeIndex,
        node: NodeId,
        point: Point<f64>,
    ) -> Result<(EdgeIndex, EdgeIndex), Error> {
        let missing = || Error::InvalidData(format!("unable to split missing edge {edge:?}"));
        let (head, tail) = self.graph.edge_endpoints(edge).ok_or_else(missing)?;
        let original = self.graph.edge(edge).ok_or_else(missing)?.clone();

        let head_fraction = original
            .geometry
            .line_locate_point(&point)
            .ok_or_else(|| Error::InvalidData(format!("unable to locate {point:?} on {edge:?}")))?;
        let (head_geometry, tail_geometry) = cut(&original.geometry, head_fraction)
            .ok_or_else(|| Error::InvalidData(format!("unable to cut {edge:?}")))?;
        debug!(
            "splitting {head} -> {tail} (ways {:?}) at {head_fraction:.3}",
            original.way_ids
        );

        self.edges_cache.remove(&self.graph, edge);
        self.graph.remove_edge(edge);
        if self.graph.node_index(node).is_none() {
            self.graph.add_node(node, point);
            self.nodes_cache.insert(node, point);
        }

        let half = |geometry, fraction: f64| {
            let mut half = StreetEdge::new(
                original.way_ids.iter().copied(),
                original.tags.clone(),
                geometry,
                original.measured_length * fraction,
            );
            half.features.speed_kph = original.features.speed_kph;
            half
        };
        let head_edge = self
            .graph
            .add_edge(head, node, half(head_geometry, head_fraction))?;
        let tail_edge = self
            .graph
            .add_edge(node, tail, half(tail_geometry, 1.0 - head_fraction))?;

        add_edge_features(&mut self.graph, &[head_edge, tail_edge]);
        self.edges_cache.update(&self.graph, &[head_edge, tail_edge]);
        Ok((head_edge, tail_edge))
    }

    /// True if the turn `origin -> turn -> dest`, arriving along `from` and
    /// leaving along `to`, must not be taken.
    ///
    /// Forbidden turns are U-turns (going back to `origin`), turns sharper
    /// than [`MAX_TURN_ANGLE`], and turns matching a turn restriction at
    /// `turn`.
    pub fn restricted(
        &self,
        origin: NodeId,
        turn: NodeId,
        dest: NodeId,
        from: &StreetEdge,
        to: &StreetEdge,
    ) -> bool {
        if origin == dest {
            return true;
        }
        if let (Some(from_bearing), Some(to_bearing)) = (from.bearing(), to.bearing()) {
            if angle_offset(from_bearing, to_bearing).abs() > MAX_TURN_ANGLE {
                return true;
            }
        }
        if !self.restrictions.is_restricted_node(turn) {
            return false;
        }
        self.restrictions.forbids(turn, &from.way_ids, &to.way_ids)
    }

    /// Length of a path in meters, using the first of any parallel edges.
    pub fn path_length(&self, path: &[NodeId]) -> f64 {
        path.iter()
            .tuple_windows()
            .filter_map(|(&from, &to)| self.graph.first_edge_between(from, to))
            .map(StreetEdge::length)
            .sum()
    }

    /// False if any step of the path has to use an impassable edge.
    pub fn is_passable(&self, path: &[NodeId]) -> bool {
        path.iter()
            .tuple_windows()
            .filter_map(|(&from, &to)| self.graph.first_edge_between(from, to))
            .all(|edge| !edge.is_impassable())
    }

    /// Bearing of the last edge of a path, in degrees.
    pub fn compass_direction(&self, path: &[NodeId]) -> Option<f64> {
        let [.., from, to] = path else {
            return None;
        };
        self.graph.first_edge_between(*from, *to)?.bearing()
    }

    /// Coordinates along a path, following the edge geometries.
    pub fn path_coords(&self, path: &[NodeId]) -> Vec<Coord<f64>> {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        let edges = path
            .iter()
            .tuple_windows()
            .filter_map(|(&from, &to)| self.graph.first_edge_between(from, to));
        for edge in edges {
            for &coord in &edge.geometry.0 {
                if coords.last() != Some(&coord) {
                    coords.push(coord);
                }
            }
        }
        if coords.is_empty() {
            coords.extend(
                path.iter()
                    .filter_map(|&node| self.graph.node(node))
                    .map(|node| node.geometry.0),
            );
        }
        coords
    }

    /// Map data for named paths between two points.
    pub fn route_map<'p>(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
        paths: impl IntoIterator<Item = (&'p str, &'p Path)>,
    ) -> RouteMap {
        let mut map = RouteMap::new(origin, destination);
        for (name, path) in paths {
            map.push(name, self.path_coords(path));
        }
        map
    }
}

/// Bounding box of the points, padded by `margin` degrees on every side.
pub fn bounding_polygon(points: &[Point<f64>], margin: f64) -> Option<Polygon<f64>> {
    let bounds = MultiPoint::from(points.to_vec()).bounding_rect()?;
    let padding = Coord {
        x: margin,
        y: margin,
    };
    Some(Rect::new(bounds.min() - padding, bounds.max() + padding).to_polygon())
}
