use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{IntervalStop, Stop};
use crate::Error;
use crate::loading::IntervalRow;

/// Kind of trip an interval is part of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntervalType {
    /// In service; handled by regular scheduling
    Revenue = 0,
    Deadhead = 1,
    Pullout = 2,
    Pullin = 3,
}

impl TryFrom<i64> for IntervalType {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(IntervalType::Revenue),
            1 => Ok(IntervalType::Deadhead),
            2 => Ok(IntervalType::Pullout),
            3 => Ok(IntervalType::Pullin),
            other => Err(Error::InvalidData(format!("unknown interval type {other}"))),
        }
    }
}

impl FromStr for IntervalType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidData(format!("unknown interval type {s:?}")))?;
        IntervalType::try_from(value)
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalType::Revenue => "Revenue",
            IntervalType::Deadhead => "Deadhead",
            IntervalType::Pullout => "Pullout",
            IntervalType::Pullin => "Pullin",
        };
        f.write_str(name)
    }
}

/// A link between two stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub id: Option<i64>,
    pub interval_type: Option<IntervalType>,
    pub from_stop: IntervalStop,
    pub to_stop: IntervalStop,
    pub route: Option<String>,
    pub direction: Option<String>,
    pub pattern: Option<String>,
    /// Distance from the map data, in feet
    pub distance_between_map: Option<i64>,
    /// Surveyed distance, in feet
    pub distance_between_measured: Option<i64>,
}

impl Interval {
    /// An interval with only its endpoints set.
    pub fn new(from_stop: impl Into<IntervalStop>, to_stop: impl Into<IntervalStop>) -> Self {
        Self {
            id: None,
            interval_type: None,
            from_stop: from_stop.into(),
            to_stop: to_stop.into(),
            route: None,
            direction: None,
            pattern: None,
            distance_between_map: None,
            distance_between_measured: None,
        }
    }

    #[must_use]
    pub fn with_type(mut self, interval_type: IntervalType) -> Self {
        self.interval_type = Some(interval_type);
        self
    }

    /// Both ends, if both have a location.
    pub fn located(&self) -> Option<(&Stop, &Stop)> {
        Some((self.from_stop.location()?, self.to_stop.location()?))
    }

    pub fn is_located(&self) -> bool {
        self.located().is_some()
    }

    /// `"{route}-{direction}-{pattern}"`, if any of the three is known.
    pub fn description(&self) -> Option<String> {
        if self.route.is_none() && self.direction.is_none() && self.pattern.is_none() {
            return None;
        }
        Some(format!(
            "{}-{}-{}",
            self.route.as_deref().unwrap_or_default(),
            self.direction.as_deref().unwrap_or_default(),
            self.pattern.as_deref().unwrap_or_default(),
        ))
    }

    /// Intervals are listed by pattern, then direction, then ID.
    pub fn display_order(&self, other: &Self) -> Ordering {
        (&self.pattern, &self.direction, self.id).cmp(&(&other.pattern, &other.direction, other.id))
    }

    /// Build an interval from an exported CSV row.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval type or one of the numeric fields
    /// is present but not a valid number.
    pub fn from_row(row: IntervalRow) -> Result<Self, Error> {
        let from_stop = Stop::from_text(
            row.from_stop_number,
            &row.from_stop_longitude,
            &row.from_stop_latitude,
            non_empty(row.from_stop_description),
        );
        let to_stop = Stop::from_text(
            row.to_stop_number,
            &row.to_stop_longitude,
            &row.to_stop_latitude,
            non_empty(row.to_stop_description),
        );

        let (route, direction, pattern) = match non_empty(row.interval_description) {
            Some(description) => {
                let mut parts = description.splitn(3, '-').map(str::to_string);
                (parts.next(), parts.next(), parts.next())
            }
            None => (
                non_empty(row.route),
                non_empty(row.direction),
                non_empty(row.pattern),
            ),
        };

        let interval_type = non_empty(row.interval_type)
            .map(|value| value.parse::<IntervalType>())
            .transpose()?;

        Ok(Self {
            id: optional_int(&row.interval_id)?,
            interval_type,
            from_stop,
            to_stop,
            route,
            direction,
            pattern,
            distance_between_map: optional_int(&row.distance_between_map)?,
            distance_between_measured: optional_int(&row.distance_between_measured)?,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn optional_int(value: &str) -> Result<Option<i64>, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidData(format!("expected an integer, got {value:?}")))
}
