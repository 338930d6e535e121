//! Intervals between stops, as exported by the scheduling system

mod interval;
mod stop;

pub use interval::{Interval, IntervalType};
pub use stop::{IntervalStop, Stop, StopWithoutLocation};
