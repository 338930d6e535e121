mod common;

use common::{
    SPACING, graph, grid_elements, grid_points, grid_source, has_reversal, response, restriction,
};
use geo::Point;
use registered_core::prelude::*;
use serde_json::json;

/// Just south of the middle row, between nodes 4 and 5 (eastbound side).
fn west_of_center() -> Point<f64> {
    Point::new(0.5 * SPACING, 0.99 * SPACING)
}

/// Just east of the middle column, between nodes 5 and 8 (northbound side).
fn north_of_center() -> Point<f64> {
    Point::new(1.01 * SPACING, 1.5 * SPACING)
}

#[test]
fn test_no_points_is_empty_graph() {
    let result = RestrictedGraph::from_points(&grid_source(), &[]);
    assert!(matches!(result, Err(Error::EmptyGraph(_))));
}

#[test]
fn test_no_streets_is_empty_graph() {
    let result = RestrictedGraph::from_points(&MemorySource::new(), &grid_points());
    assert!(matches!(result, Err(Error::EmptyGraph(_))));
}

#[test]
fn test_profiles_are_merged() {
    // the parking aisle continues east from node 3
    let parking = graph(json!([
        {"type": "node", "id": 3, "lat": 0.0, "lon": 2.0 * SPACING},
        {"type": "node", "id": 50, "lat": 0.0, "lon": 3.0 * SPACING},
        {"type": "way", "id": 300, "nodes": [3, 50],
         "tags": {"highway": "service", "service": "parking_aisle"}}
    ]));
    let source = grid_source().with_graph(QueryProfile::Parking, parking);
    let mut graph = RestrictedGraph::from_points(&source, &grid_points()).unwrap();

    assert_eq!(graph.graph().node_count(), 10);
    let path = graph
        .shortest_path(Point::new(0.0, 0.0), Point::new(3.0 * SPACING, 0.0), Weight::Length)
        .unwrap()
        .unwrap();
    assert_eq!(path, vec![1, 2, 3, 50]);
}

#[test]
fn test_no_path_between_disconnected_streets() {
    let source = MemorySource::new().with_graph(
        QueryProfile::DriveService,
        graph(json!([
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "node", "id": 2, "lat": 0.0, "lon": SPACING},
            {"type": "node", "id": 3, "lat": 0.01, "lon": 0.0},
            {"type": "node", "id": 4, "lat": 0.01, "lon": SPACING},
            {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "primary"}},
            {"type": "way", "id": 11, "nodes": [3, 4], "tags": {"highway": "primary"}}
        ])),
    );
    let mut graph =
        RestrictedGraph::from_points(&source, &[Point::new(0.0, 0.0), Point::new(0.0, 0.01)])
            .unwrap();

    let path = graph
        .shortest_path(Point::new(0.0, 0.0), Point::new(SPACING, 0.01), Weight::TravelTime)
        .unwrap();
    assert_eq!(path, None);
}

#[test]
fn test_left_turn_without_restriction() {
    let mut graph = RestrictedGraph::from_points(&grid_source(), &grid_points()).unwrap();
    let path = graph
        .shortest_path(west_of_center(), north_of_center(), Weight::Length)
        .unwrap()
        .unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path[1], 5);
}

#[test]
fn test_restriction_forces_detour() {
    let source = grid_source().with_restrictions(response(json!([restriction(1, 101, 5, 201)])));
    let mut graph = RestrictedGraph::from_points(&source, &grid_points()).unwrap();
    assert!(graph.restrictions().is_restricted_node(5));

    let path = graph
        .shortest_path(west_of_center(), north_of_center(), Weight::Length)
        .unwrap()
        .unwrap();
    // around the south-east block and back north through node 5
    assert_eq!(path[1..6], [5, 6, 3, 2, 5]);
    assert_eq!(path.len(), 7);
    assert!(!has_reversal(&graph, &path));
}

#[test]
fn test_no_u_turns() {
    let mut graph = RestrictedGraph::from_points(&grid_source(), &grid_points()).unwrap();
    let eastbound = west_of_center();
    // same spot on the other side of the street
    let westbound = Point::new(0.5 * SPACING, 1.01 * SPACING);

    let path = graph
        .shortest_path(eastbound, westbound, Weight::Length)
        .unwrap()
        .unwrap();
    assert!(path.len() > 3, "{path:?}");
    assert_ne!(path.first(), path.last());
    assert!(!has_reversal(&graph, &path));
    // around a whole block
    assert!(graph.path_length(&path) > 4.0 * 110.0);
}

#[test]
fn test_same_point_is_single_node_path() {
    let mut graph = RestrictedGraph::from_points(&grid_source(), &grid_points()).unwrap();
    let path = graph
        .shortest_path(west_of_center(), west_of_center(), Weight::TravelTime)
        .unwrap()
        .unwrap();
    assert_eq!(path.len(), 1);
    assert_eq!(graph.path_length(&path), 0.0);
    assert_eq!(graph.compass_direction(&path), None);
}

#[test]
fn test_low_clearance_is_avoided() {
    let mut elements = grid_elements();
    // a low bridge over the middle row
    if let Some(ways) = elements.as_array_mut() {
        for way in ways.iter_mut().filter(|element| element["id"] == 101) {
            way["tags"]["maxheight"] = json!("10'");
        }
    }
    let source = MemorySource::new().with_graph(QueryProfile::DriveService, graph(elements));
    let mut graph = RestrictedGraph::from_points(&source, &grid_points()).unwrap();

    let path = graph
        .shortest_path(
            Point::new(0.0, SPACING),
            Point::new(2.0 * SPACING, SPACING),
            Weight::TravelTime,
        )
        .unwrap()
        .unwrap();
    assert!(!path.contains(&5), "{path:?}");
    assert_eq!(path.first(), Some(&4));
    assert_eq!(path.last(), Some(&6));
}

#[test]
fn test_impassable_streets_still_order_by_length() {
    let mut elements = grid_elements();
    // every street under a low bridge
    if let Some(ways) = elements.as_array_mut() {
        for way in ways.iter_mut().filter(|element| element["type"] == "way") {
            way["tags"]["maxheight"] = json!("10'");
        }
    }
    let source = MemorySource::new().with_graph(QueryProfile::DriveService, graph(elements));
    let mut graph = RestrictedGraph::from_points(&source, &grid_points()).unwrap();

    let path = graph
        .shortest_path(Point::new(0.0, SPACING), Point::new(SPACING, SPACING), Weight::Length)
        .unwrap()
        .unwrap();
    assert_eq!(path, vec![4, 5]);
    assert!(!graph.is_passable(&path));

    let corner_to_corner = graph
        .shortest_path(Point::new(0.0, 0.0), Point::new(2.0 * SPACING, 2.0 * SPACING), Weight::Length)
        .unwrap()
        .unwrap();
    assert_eq!(corner_to_corner.len(), 5, "{corner_to_corner:?}");
    let length = graph.path_length(&corner_to_corner);
    assert!(length.is_finite());
    assert!(length < 5.0 * IMPASSABLE, "{length}");
}
