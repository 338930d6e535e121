//! Fastest and shortest paths for one interval

use std::sync::LazyLock;

use log::{info, warn};
use regex::Regex;
use serde::Serialize;

use super::RestrictedGraph;
use crate::model::{Interval, IntervalStop, IntervalType, Weight};
use crate::{Error, Path};

/// Stop pairs which share a name but are not usefully connected by road.
pub const IGNORED_PAIRS: [(&str, &str); 8] = [
    ("4191", "4277"),
    ("73619", "89617"),
    ("109898", "109821"),
    ("censq", "16653"),
    ("14748", "censq"),
    ("fell", "5333"),
    ("ncamb", "12295"),
    ("12295", "ncamb"),
];

/// Parts of a stop description which only distinguish berths or directions
/// at the same place.
static IGNORED_DESCRIPTION_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d|Inbound|Outbound").expect("valid pattern"));

/// True if no road path should be calculated for the interval.
///
/// Revenue intervals are handled by regular scheduling. Stops whose
/// descriptions only differ by digits or by Inbound/Outbound are at the
/// same place, as are a few known stop pairs.
pub fn should_ignore(interval: &Interval) -> bool {
    if interval.interval_type == Some(IntervalType::Revenue) {
        return true;
    }

    let (from_id, to_id) = (interval.from_stop.id(), interval.to_stop.id());
    if IGNORED_PAIRS
        .iter()
        .any(|&(from, to)| from == from_id && to == to_id)
    {
        return true;
    }

    match (
        interval.from_stop.description(),
        interval.to_stop.description(),
    ) {
        (Some(from), Some(to)) => {
            IGNORED_DESCRIPTION_PARTS.replace_all(from, "")
                == IGNORED_DESCRIPTION_PARTS.replace_all(to, "")
        }
        _ => false,
    }
}

/// The paths calculated for one interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalCalculation {
    pub interval: Interval,
    /// Cheapest by travel time
    pub fastest_path: Option<Path>,
    /// Cheapest by length; absent when it is the same as the fastest
    pub shortest_path: Option<Path>,
}

impl IntervalCalculation {
    /// Calculate the fastest and shortest paths for an interval.
    ///
    /// Ignored intervals and intervals with an unlocated stop get no
    /// paths. The shortest path is only looked for if a fastest path
    /// exists. A failed search is logged and leaves the interval
    /// without paths.
    pub fn calculate(interval: Interval, graph: &mut RestrictedGraph) -> Self {
        let (fastest_path, mut shortest_path) = match Self::search(&interval, graph) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(
                    "no paths for interval {}: {e}",
                    interval.description().unwrap_or_default()
                );
                (None, None)
            }
        };

        if fastest_path == shortest_path {
            shortest_path = None;
        }

        Self {
            interval,
            fastest_path,
            shortest_path,
        }
    }

    fn search(
        interval: &Interval,
        graph: &mut RestrictedGraph,
    ) -> Result<(Option<Path>, Option<Path>), Error> {
        let Some((from, to)) = interval.located().filter(|_| !should_ignore(interval)) else {
            return Ok((None, None));
        };

        info!("calculating interval from {} to {}", from.id, to.id);
        let fastest_path = graph.shortest_path(from, to, Weight::TravelTime)?;
        let shortest_path = match fastest_path {
            Some(_) => graph.shortest_path(from, to, Weight::Length)?,
            None => None,
        };
        Ok((fastest_path, shortest_path))
    }

    pub fn from_stop(&self) -> &IntervalStop {
        &self.interval.from_stop
    }

    pub fn to_stop(&self) -> &IntervalStop {
        &self.interval.to_stop
    }

    /// The interval type as a title: "Deadhead", "Pullout", ...
    pub fn interval_type(&self) -> String {
        self.interval
            .interval_type
            .map(|interval_type| interval_type.to_string())
            .unwrap_or_default()
    }

    pub fn description(&self) -> String {
        self.interval.description().unwrap_or_default()
    }

    /// The distinct paths found, fastest first.
    pub fn paths(&self) -> Vec<&Path> {
        self.fastest_path
            .iter()
            .chain(self.shortest_path.iter())
            .collect()
    }

    /// The distinct paths found, with their names.
    pub fn named_paths(&self) -> Vec<(&'static str, &Path)> {
        let fastest = self.fastest_path.as_ref().map(|path| ("Fastest", path));
        let shortest = self.shortest_path.as_ref().map(|path| ("Shortest", path));
        fastest.into_iter().chain(shortest).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Stop, StopWithoutLocation};
    use geo::Point;

    fn stop(id: &str, description: &str) -> Stop {
        Stop::new(id, Point::new(0.0, 0.0), Some(description.to_string()))
    }

    fn interval(from: (&str, &str), to: (&str, &str)) -> Interval {
        Interval::new(stop(from.0, from.1), stop(to.0, to.1)).with_type(IntervalType::Deadhead)
    }

    #[test]
    fn test_ignore_berths_and_directions() {
        assert!(should_ignore(&interval(
            ("1", "Sullivan Station Busway - Berth 1"),
            ("2", "Sullivan Station Busway - Berth 2"),
        )));
        assert!(should_ignore(&interval(
            ("1", "Chelsea - Inbound"),
            ("2", "Chelsea - Outbound"),
        )));
        assert!(!should_ignore(&interval(
            ("1", "Sullivan Station Busway - Berth 1"),
            ("2", "Fields Corner Busway"),
        )));
    }

    #[test]
    fn test_ignore_description_rule_is_symmetric() {
        let forward = interval(("1", "Chelsea - Inbound"), ("2", "Chelsea - Outbound"));
        let backward = interval(("2", "Chelsea - Outbound"), ("1", "Chelsea - Inbound"));
        assert_eq!(should_ignore(&forward), should_ignore(&backward));
    }

    #[test]
    fn test_ignored_pairs_are_ordered() {
        for (from, to) in IGNORED_PAIRS {
            assert!(should_ignore(&interval((from, "A"), (to, "B"))));
            let reversed = IGNORED_PAIRS.contains(&(to, from));
            assert_eq!(should_ignore(&interval((to, "A"), (from, "B"))), reversed);
        }
        assert!(should_ignore(&interval(("ncamb", "A"), ("12295", "B"))));
        assert!(should_ignore(&interval(("12295", "A"), ("ncamb", "B"))));
        assert!(should_ignore(&interval(("4191", "A"), ("4277", "B"))));
        assert!(!should_ignore(&interval(("4277", "A"), ("4191", "B"))));
    }

    #[test]
    fn test_ignore_revenue() {
        let revenue = Interval::new(stop("1", "A"), stop("2", "B")).with_type(IntervalType::Revenue);
        assert!(should_ignore(&revenue));
        let untyped = Interval::new(stop("1", "A"), stop("2", "B"));
        assert!(!should_ignore(&untyped));
    }

    #[test]
    fn test_missing_descriptions_are_not_ignored() {
        let interval = Interval::new(
            StopWithoutLocation {
                id: "1".to_string(),
                description: None,
            },
            StopWithoutLocation {
                id: "2".to_string(),
                description: None,
            },
        );
        assert!(!should_ignore(&interval));
    }

    #[test]
    fn test_failed_search_leaves_no_paths() {
        use crate::model::{RestrictionSet, StreetGraph};

        let mut graph = RestrictedGraph::new(StreetGraph::new(), RestrictionSet::new());
        let interval = Interval::new(stop("1", "Harvard"), stop("2", "Central"))
            .with_type(IntervalType::Deadhead);
        let (from, to) = interval.located().unwrap();
        assert!(graph.shortest_path(from, to, Weight::TravelTime).is_err());

        let calculation = IntervalCalculation::calculate(interval.clone(), &mut graph);

        assert_eq!(calculation.interval, interval);
        assert!(calculation.paths().is_empty());
    }

    #[test]
    fn test_named_paths() {
        let calculation = IntervalCalculation {
            interval: interval(("1", "A"), ("2", "B")),
            fastest_path: Some(vec![1, 2, 3]),
            shortest_path: Some(vec![1, 4, 3]),
        };
        assert_eq!(calculation.paths().len(), 2);
        let names: Vec<&str> = calculation.named_paths().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["Fastest", "Shortest"]);
        assert_eq!(calculation.interval_type(), "Deadhead");

        let empty = IntervalCalculation {
            fastest_path: None,
            shortest_path: None,
            ..calculation
        };
        assert!(empty.paths().is_empty());
        assert_eq!(empty.description(), "");
    }
}
