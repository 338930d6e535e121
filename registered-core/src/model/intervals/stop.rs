use geo::Point;
use serde::Serialize;

/// A located end of an interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub id: String,
    /// Longitude/latitude
    #[serde(serialize_with = "serialize_point")]
    pub point: Point<f64>,
    /// Free text, often naming the street the stop is on
    pub description: Option<String>,
}

impl Stop {
    pub fn new(id: impl Into<String>, point: Point<f64>, description: Option<String>) -> Self {
        Self {
            id: id.into(),
            point,
            description,
        }
    }

    /// Parse a stop from text coordinates, falling back to a stop without a
    /// location when either coordinate is not a number.
    pub fn from_text(
        id: impl Into<String>,
        longitude: &str,
        latitude: &str,
        description: Option<String>,
    ) -> IntervalStop {
        let id = id.into();
        match (
            longitude.trim().parse::<f64>(),
            latitude.trim().parse::<f64>(),
        ) {
            (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => {
                IntervalStop::Located(Stop::new(id, Point::new(x, y), description))
            }
            _ => IntervalStop::Unlocated(StopWithoutLocation { id, description }),
        }
    }
}

fn serialize_point<S>(point: &Point<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    [point.x(), point.y()].serialize(serializer)
}

/// A stop we do not have a location for. It cannot be routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopWithoutLocation {
    pub id: String,
    pub description: Option<String>,
}

/// Either end of an interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntervalStop {
    Located(Stop),
    Unlocated(StopWithoutLocation),
}

impl IntervalStop {
    pub fn id(&self) -> &str {
        match self {
            IntervalStop::Located(stop) => &stop.id,
            IntervalStop::Unlocated(stop) => &stop.id,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            IntervalStop::Located(stop) => stop.description.as_deref(),
            IntervalStop::Unlocated(stop) => stop.description.as_deref(),
        }
    }

    pub fn location(&self) -> Option<&Stop> {
        match self {
            IntervalStop::Located(stop) => Some(stop),
            IntervalStop::Unlocated(_) => None,
        }
    }
}

impl From<Stop> for IntervalStop {
    fn from(stop: Stop) -> Self {
        IntervalStop::Located(stop)
    }
}

impl From<StopWithoutLocation> for IntervalStop {
    fn from(stop: StopWithoutLocation) -> Self {
        IntervalStop::Unlocated(stop)
    }
}
