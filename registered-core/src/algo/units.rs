//! Normalization of free-text OSM measurements (`width`, `maxheight`,
//! `maxspeed`) into metric numbers.

use log::warn;

const FEET_TO_METERS: f64 = 0.3048;
const MPH_TO_KPH: f64 = 1.609_344;

/// Tag values which carry no usable measurement.
const UNKNOWN_WIDTHS: [&str; 4] = ["t", "none", "default", "below_default"];

/// Clean a width (or height) specifier into meters.
///
/// - `"1"` -> 1.0
/// - `"2.0 m"` -> 2.0
/// - `"3;4"` -> 7.0
/// - `"5.2 ft"` -> 1.58496
/// - `"4'6\""` -> 1.3716
///
/// Unknown values return `None` rather than zero.
pub fn clean_width(spec: &str) -> Option<f64> {
    let spec = spec.trim();
    if UNKNOWN_WIDTHS.contains(&spec) {
        return None;
    }

    if let Ok(meters) = spec.parse::<f64>() {
        return Some(meters);
    }

    if spec.contains(';') {
        return spec.split(';').map(clean_width).sum();
    }

    if let Some(meters) = spec.strip_suffix(" m") {
        return parse_or_warn(meters, spec);
    }

    let (feet, inches) = if let Some(feet) = spec.strip_suffix(" ft") {
        (feet, None)
    } else if let Some(feet) = spec.strip_suffix(" feet") {
        (feet, None)
    } else if let Some(feet_inches) = spec.strip_suffix('"') {
        match feet_inches.split_once('\'') {
            Some((feet, inches)) => (feet, Some(inches)),
            None => {
                warn!("unknown width specification: {spec:?}");
                return None;
            }
        }
    } else if let Some(feet) = spec.strip_suffix('\'') {
        (feet, None)
    } else {
        warn!("unknown width specification: {spec:?}");
        return None;
    };

    let mut feet = parse_or_warn(feet, spec)?;
    if let Some(inches) = inches {
        feet += parse_or_warn(inches, spec)? / 12.0;
    }

    Some(feet * FEET_TO_METERS)
}

fn parse_or_warn(value: &str, spec: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("unknown width specification: {spec:?}");
            None
        }
    }
}

/// Parse a `maxspeed` value into km/h.
///
/// Handles bare numbers (km/h), `"N mph"`, `"N km/h"` and `;`-separated
/// lists (averaged). Symbolic values such as `"signals"` return `None`.
pub fn parse_speed(spec: &str) -> Option<f64> {
    let speeds: Vec<f64> = spec.split(';').filter_map(parse_single_speed).collect();
    if speeds.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
}

fn parse_single_speed(spec: &str) -> Option<f64> {
    let spec = spec.trim();
    if let Some(mph) = spec.strip_suffix("mph") {
        return mph.trim().parse::<f64>().ok().map(|speed| speed * MPH_TO_KPH);
    }
    let kph = spec
        .strip_suffix("km/h")
        .or_else(|| spec.strip_suffix("kmh"))
        .unwrap_or(spec);
    kph.trim()
        .parse::<f64>()
        .ok()
        .filter(|speed| speed.is_finite() && *speed > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_width(spec: &str, expected: f64) {
        let width = clean_width(spec).unwrap_or_else(|| panic!("{spec:?} did not parse"));
        assert!(
            (width - expected).abs() < 1e-9,
            "clean_width({spec:?}) = {width}, expected {expected}"
        );
    }

    #[test]
    fn test_clean_width() {
        assert_width("1", 1.0);
        assert_width("2.0 m", 2.0);
        assert_width("3;4", 7.0);
        assert_width("5.2 ft", 1.58496);
        assert_width("12 feet", 3.6576);
        assert_width("4'6\"", 1.3716);
        assert_width("14'", 4.2672);
    }

    #[test]
    fn test_clean_width_unknown() {
        for spec in ["t", "none", "default", "below_default", "wide", "3 furlongs", "a'b\""] {
            assert_eq!(clean_width(spec), None, "{spec:?}");
        }
    }

    #[test]
    fn test_clean_width_list_with_unknown_part() {
        assert_eq!(clean_width("3;none"), None);
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("50"), Some(50.0));
        assert_eq!(parse_speed("40 km/h"), Some(40.0));
        let mph = parse_speed("30 mph").unwrap();
        assert!((mph - 48.280_32).abs() < 1e-6);
        assert_eq!(parse_speed("40;60"), Some(50.0));
        assert_eq!(parse_speed("signals"), None);
        assert_eq!(parse_speed(""), None);
    }
}
