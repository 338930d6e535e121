//! Bearing arithmetic and line cutting used while snapping points onto
//! street edges.

use geo::{
    Bearing, Closest, ClosestPoint, Coord, Distance, Euclidean, Haversine, LineInterpolatePoint,
    LineLocatePoint, LineString, Point,
};

/// Signed offset in degrees from `base` to `angle`, in the range (-180, 180].
///
/// Positive offsets are clockwise (a right turn), negative offsets are
/// counter-clockwise (a left turn). Both inputs are bearings in [0, 360).
pub fn angle_offset(base: f64, angle: f64) -> f64 {
    let offset = fold_bearing(angle) - fold_bearing(base);

    if offset <= -180.0 {
        offset + 360.0
    } else if offset > 180.0 {
        offset - 360.0
    } else {
        offset
    }
}

/// Map a bearing in [0, 360) onto (-180, 180].
fn fold_bearing(bearing: f64) -> f64 {
    if bearing > 180.0 {
        bearing - 360.0
    } else {
        bearing
    }
}

/// Compass bearing from `origin` to `destination`: North = 0, East = 90.
pub fn bearing(origin: Point<f64>, destination: Point<f64>) -> f64 {
    Haversine.bearing(origin, destination).rem_euclid(360.0)
}

/// Heading at the start of a line, taken from its first two distinct
/// coordinates. `None` for lines with no length.
pub fn initial_bearing(line: &LineString<f64>) -> Option<f64> {
    let start = *line.0.first()?;
    let next = line.0.iter().skip(1).find(|coord| **coord != start)?;
    Some(bearing(start.into(), (*next).into()))
}

/// Orthogonal projection of `point` onto `line` (planar, in degrees).
pub fn project(line: &LineString<f64>, point: Point<f64>) -> Option<Point<f64>> {
    match line.closest_point(&point) {
        Closest::Intersection(projected) | Closest::SinglePoint(projected) => Some(projected),
        Closest::Indeterminate => None,
    }
}

/// Planar distance from `point` to the nearest part of `line`, in degrees.
pub fn distance_to_line(line: &LineString<f64>, point: Point<f64>) -> f64 {
    project(line, point).map_or(f64::INFINITY, |projected| {
        Euclidean.distance(projected, point)
    })
}

/// Split a line in two at a normalized distance (0..1) from its start.
///
/// Distances outside the open interval are clamped to 0.01 / 0.99 so neither
/// half is degenerate. Returns `None` if the line cannot be located against
/// (for example a line with no length).
pub fn cut(line: &LineString<f64>, distance: f64) -> Option<(LineString<f64>, LineString<f64>)> {
    let distance = if distance <= 0.0 {
        0.01
    } else if distance >= 1.0 {
        0.99
    } else {
        distance
    };

    let coords = &line.0;
    for (i, coord) in coords.iter().enumerate() {
        let point_distance = line.line_locate_point(&Point::from(*coord))?;
        if point_distance == distance {
            return Some((
                LineString::from(coords[..=i].to_vec()),
                LineString::from(coords[i..].to_vec()),
            ));
        }
        if point_distance > distance {
            let cut_point: Coord<f64> = line.line_interpolate_point(distance)?.into();

            let mut head = coords[..i].to_vec();
            head.push(cut_point);
            let mut tail = Vec::with_capacity(coords.len() - i + 1);
            tail.push(cut_point);
            tail.extend_from_slice(&coords[i..]);

            return Some((LineString::from(head), LineString::from(tail)));
        }
    }

    None
}
