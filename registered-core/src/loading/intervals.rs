use std::fs::File;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::Error;
use crate::model::Interval;

/// One row of an interval export. Every column is optional text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct IntervalRow {
    pub interval_id: String,
    pub interval_type: String,
    pub from_stop_number: String,
    pub from_stop_description: String,
    pub from_stop_latitude: String,
    pub from_stop_longitude: String,
    pub to_stop_number: String,
    pub to_stop_description: String,
    pub to_stop_latitude: String,
    pub to_stop_longitude: String,
    pub route: String,
    pub direction: String,
    pub pattern: String,
    pub interval_description: String,
    pub distance_between_map: String,
    pub distance_between_measured: String,
}

/// Read intervals from a CSV export, ordered by pattern, direction and ID.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or a row is malformed.
pub fn read_intervals(path: &Path) -> Result<Vec<Interval>, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    read_intervals_from(file)
}

/// Read intervals from any CSV reader.
///
/// # Errors
///
/// Returns an error if a row is malformed.
pub fn read_intervals_from(reader: impl std::io::Read) -> Result<Vec<Interval>, Error> {
    let mut intervals = csv::Reader::from_reader(reader)
        .deserialize::<IntervalRow>()
        .map(|row| Interval::from_row(row?))
        .collect::<Result<Vec<_>, Error>>()?;
    intervals.sort_by(Interval::display_order);
    info!("read {} intervals", intervals.len());
    Ok(intervals)
}
