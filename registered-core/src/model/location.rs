use geo::Point;

use crate::model::intervals::Stop;

/// A point to snap onto the street graph, with the free-text description
/// used to prefer a street whose name resembles it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location<'a> {
    pub point: Point<f64>,
    pub description: Option<&'a str>,
}

impl<'a> Location<'a> {
    pub fn new(point: Point<f64>) -> Self {
        Self {
            point,
            description: None,
        }
    }

    pub fn with_description(point: Point<f64>, description: &'a str) -> Self {
        Self {
            point,
            description: Some(description),
        }
    }

    /// Key identifying this exact coordinate.
    pub(crate) fn key(&self) -> (u64, u64) {
        (self.point.x().to_bits(), self.point.y().to_bits())
    }
}

impl From<Point<f64>> for Location<'_> {
    fn from(point: Point<f64>) -> Self {
        Location::new(point)
    }
}

impl<'a> From<&'a Stop> for Location<'a> {
    fn from(stop: &'a Stop) -> Self {
        Location {
            point: stop.point,
            description: stop.description.as_deref(),
        }
    }
}
