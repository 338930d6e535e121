//! Data needed to draw computed paths on a map

use geo::{Coord, Point, Rect};
use serde::Serialize;

/// Colors given to paths, in order.
pub const DEFAULT_COLORS: [&str; 4] = ["red", "yellow", "blue", "green"];

/// One drawn path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePolyline {
    pub name: String,
    pub color: &'static str,
    /// Longitude/latitude coordinates along the path
    pub coords: Vec<Coord<f64>>,
}

/// Paths between two points, with the view that frames them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMap {
    pub origin: Point<f64>,
    pub destination: Point<f64>,
    pub polylines: Vec<RoutePolyline>,
    /// Framed area: the box around origin and destination
    pub bounds: Rect<f64>,
}

impl RouteMap {
    pub fn new(origin: Point<f64>, destination: Point<f64>) -> Self {
        Self {
            origin,
            destination,
            polylines: Vec::new(),
            bounds: Rect::new(origin.0, destination.0),
        }
    }

    /// Add a path, colored after the ones already added. Paths beyond the
    /// number of available colors are not drawn.
    pub fn push(&mut self, name: impl Into<String>, coords: Vec<Coord<f64>>) {
        let Some(&color) = DEFAULT_COLORS.get(self.polylines.len()) else {
            return;
        };
        self.polylines.push(RoutePolyline {
            name: name.into(),
            color,
            coords,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    #[test]
    fn test_colors_and_bounds() {
        let mut map = RouteMap::new(Point::new(1.0, 4.0), Point::new(3.0, 2.0));
        for name in ["a", "b", "c", "d", "e"] {
            map.push(name, vec![coord! { x: 1.0, y: 4.0 }]);
        }
        let colors: Vec<&str> = map.polylines.iter().map(|line| line.color).collect();
        assert_eq!(colors, DEFAULT_COLORS.to_vec());
        assert_eq!(map.bounds.min(), coord! { x: 1.0, y: 2.0 });
        assert_eq!(map.bounds.max(), coord! { x: 3.0, y: 4.0 });
    }
}
