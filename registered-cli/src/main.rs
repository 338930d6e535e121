mod config;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use geo::Point;
use registered::{CalculationReport, render_reports};
use registered_core::{
    Error, GraphSource, Interval, IntervalCalculation, OverpassSource, RestrictedGraph,
    read_intervals, should_ignore,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;

/// Estimate road distances for the intervals in a CSV export and write a
/// JSON report.
#[derive(Parser, Debug)]
#[command(name = "registered-intervals", version, about, long_about = None)]
struct Args {
    /// TOML file with `[graph]` and `[overpass]` settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for cached Overpass responses
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Keep revenue and other ignored intervals in the report, without paths
    #[arg(long)]
    include_ignored: bool,

    /// Interval export to read
    input: PathBuf,

    /// Where to write the report
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(cache_dir) = &args.cache_dir {
        config.overpass.cache_dir = Some(cache_dir.clone());
    }

    let intervals = read_intervals(&args.input)?;
    let intervals = select_intervals(intervals, args.include_ignored);

    let points = located_points(&intervals);
    if points.is_empty() {
        info!("no intervals with locations to process");
        return write_reports(&args.output, &[]);
    }

    let source = OverpassSource::new(config.overpass.clone())?;
    let mut graph = build_graph(&source, &points, &config)?;
    let calculations = calculate(&mut graph, intervals);
    let reports = render_reports(&graph, &calculations);

    write_reports(&args.output, &reports)
}

fn select_intervals(intervals: Vec<Interval>, include_ignored: bool) -> Vec<Interval> {
    if include_ignored {
        return intervals;
    }
    intervals
        .into_iter()
        .filter(|interval| !should_ignore(interval))
        .collect()
}

fn located_points(intervals: &[Interval]) -> Vec<Point<f64>> {
    intervals
        .iter()
        .filter_map(Interval::located)
        .flat_map(|(from, to)| [from.point, to.point])
        .collect()
}

fn build_graph(
    source: &impl GraphSource,
    points: &[Point<f64>],
    config: &Config,
) -> Result<RestrictedGraph, Error> {
    info!("building graph around {} stops", points.len());
    RestrictedGraph::from_points_with_config(source, points, &config.graph)
}

fn calculate(graph: &mut RestrictedGraph, intervals: Vec<Interval>) -> Vec<IntervalCalculation> {
    let row_count = intervals.len();
    intervals
        .into_iter()
        .enumerate()
        .map(|(index, interval)| {
            info!(
                "processing row {} of {row_count}: {}",
                index + 1,
                interval.description().unwrap_or_default()
            );
            IntervalCalculation::calculate(interval, graph)
        })
        .collect()
}

fn write_reports(path: &Path, reports: &[CalculationReport]) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, reports)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("wrote {} reports to {}", reports.len(), path.display());
    Ok(())
}
