//! Road distance estimates for transit intervals.
//!
//! The routing engine lives in [`registered_core`]; this crate turns its
//! calculations into reports that can be rendered or written out as JSON.

pub mod report;

pub use registered_core::prelude;
pub use registered_core::{
    Error, GraphConfig, GraphSource, Interval, IntervalCalculation, IntervalStop, IntervalType,
    MemorySource, OverpassConfig, OverpassSource, RestrictedGraph, RouteMap, Stop, Weight,
    read_intervals, should_ignore,
};
pub use report::{CalculationReport, StopSummary, render_reports};
