//! Per-interval reports: length rows, directions links and a GeoJSON map.

use geojson::{Feature, FeatureCollection, Value};
use rayon::prelude::*;
use serde::Serialize;

use registered_core::prelude::*;
use registered_core::{IntervalCalculation, RestrictedGraph, RouteMap};

const FEET_PER_METER: f64 = 3.281;

/// Labels for computed paths, in the order [`IntervalCalculation::paths`]
/// returns them.
const PATH_LABELS: [&str; 2] = ["Fastest (red)", "Shortest (yellow)"];
/// Shown instead of a length for a path which needs a street a bus cannot use.
const IMPASSABLE_ROW: &str = "impassable";

/// One end of an interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSummary {
    pub id: String,
    pub description: Option<String>,
    /// `[longitude, latitude]`
    pub location: Option<[f64; 2]>,
    pub osm_url: Option<String>,
}

impl From<&IntervalStop> for StopSummary {
    fn from(stop: &IntervalStop) -> Self {
        let location = stop.location().map(|stop| stop.point);
        Self {
            id: stop.id().to_string(),
            description: stop.description().map(str::to_string),
            location: location.map(|point| [point.x(), point.y()]),
            osm_url: location.map(|point| {
                let (x, y) = (point.x(), point.y());
                format!("https://www.openstreetmap.org/query?lat={y}&lon={x}#map=18/{y}/{x}")
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculationReport {
    pub description: String,
    pub interval_type: String,
    pub from_stop: StopSummary,
    pub to_stop: StopSummary,
    /// `(label, length in feet)` pairs
    pub rows: Vec<(String, String)>,
    /// Bearing of the final edge of the fastest path
    pub compass_direction: Option<f64>,
    pub google_maps_url: Option<String>,
    pub osm_url: Option<String>,
    pub map: Option<FeatureCollection>,
}

impl CalculationReport {
    pub fn new(graph: &RestrictedGraph, calculation: &IntervalCalculation) -> Self {
        let interval = &calculation.interval;
        let located = interval.located();

        let (google_maps_url, osm_url, map) = match located {
            Some((from, to)) => {
                let map = graph.route_map(from.point, to.point, calculation.named_paths());
                (
                    Some(google_maps_url(from, to)),
                    Some(osm_url(from, to)),
                    Some(map_features(&map)),
                )
            }
            None => (None, None, None),
        };

        Self {
            description: calculation.description(),
            interval_type: calculation.interval_type(),
            from_stop: calculation.from_stop().into(),
            to_stop: calculation.to_stop().into(),
            rows: length_rows(graph, calculation),
            compass_direction: calculation
                .fastest_path
                .as_ref()
                .and_then(|path| graph.compass_direction(path)),
            google_maps_url,
            osm_url,
            map,
        }
    }
}

/// Build a report for every calculation, in order.
pub fn render_reports(
    graph: &RestrictedGraph,
    calculations: &[IntervalCalculation],
) -> Vec<CalculationReport> {
    calculations
        .par_iter()
        .map(|calculation| CalculationReport::new(graph, calculation))
        .collect()
}

fn length_rows(graph: &RestrictedGraph, calculation: &IntervalCalculation) -> Vec<(String, String)> {
    let interval = &calculation.interval;
    let mut rows = Vec::new();

    let recorded = [
        ("Measured", interval.distance_between_measured),
        ("Map", interval.distance_between_map),
    ];
    for (label, distance) in recorded {
        if let Some(distance) = distance.filter(|&distance| distance != 0) {
            rows.push((label.to_string(), distance.to_string()));
        }
    }

    let paths = calculation.paths();
    for (label, path) in PATH_LABELS.iter().zip(&paths) {
        let length = if graph.is_passable(path) {
            meters_to_feet(graph.path_length(path)).to_string()
        } else {
            IMPASSABLE_ROW.to_string()
        };
        rows.push((label.to_string(), length));
    }
    if paths.is_empty() {
        rows.push(("Empty".to_string(), "0".to_string()));
    }

    rows
}

/// Whole feet in a distance, rounded toward zero.
#[allow(clippy::cast_possible_truncation)]
pub fn meters_to_feet(meters: f64) -> i64 {
    (meters * FEET_PER_METER) as i64
}

fn google_maps_url(from: &Stop, to: &Stop) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&travelmode=driving&origin={},{}&destination={},{}",
        from.point.y(),
        from.point.x(),
        to.point.y(),
        to.point.x()
    )
}

fn osm_url(from: &Stop, to: &Stop) -> String {
    format!(
        "https://www.openstreetmap.org/directions?engine=fossgis_osrm_car&route={},{};{},{}",
        from.point.y(),
        from.point.x(),
        to.point.y(),
        to.point.x()
    )
}

fn map_features(map: &RouteMap) -> FeatureCollection {
    let mut features: Vec<Feature> = map
        .polylines
        .iter()
        .map(|polyline| {
            let line = polyline
                .coords
                .iter()
                .map(|coord| vec![coord.x, coord.y])
                .collect();
            let mut feature = Feature::from(Value::LineString(line));
            feature.set_property("name", polyline.name.clone());
            feature.set_property("color", polyline.color);
            feature
        })
        .collect();

    features.push(marker(map.origin, "origin", "play", "green"));
    features.push(marker(map.destination, "destination", "stop", "red"));

    let (min, max) = (map.bounds.min(), map.bounds.max());
    FeatureCollection {
        bbox: Some(vec![min.x, min.y, max.x, max.y]),
        features,
        foreign_members: None,
    }
}

fn marker(point: geo::Point<f64>, name: &str, icon: &str, color: &str) -> Feature {
    let mut feature = Feature::from(Value::Point(vec![point.x(), point.y()]));
    feature.set_property("name", name);
    feature.set_property("icon", icon);
    feature.set_property("color", color);
    feature
}
