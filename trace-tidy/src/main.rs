use clap::{Args, Parser, Subcommand};
use geojson::{FeatureCollection, GeoJson};
use log::{info, warn};
use serde_json::{json, to_value, Map};
use std::fs::File;
use std::io::{BufRead, BufReader};
use trace_tidy::algo::{SortChronologically, TidySummary};
use trace_tidy::geojson_debug::tidy_result_features;
use trace_tidy::model::{Trace, TracePoint};
use trace_tidy::Thresholds;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tidy traces and convert them to a GeoJSON FeatureCollection.
    ///
    /// For each trace the collection contains the original and the tidied trace as LineStrings
    /// and a Point for each retained sample. The JSON will be written to stdout
    Tidy(TidyArgs),
    /// Tidy traces and print a JSON summary of the reduction for each trace.
    ///
    /// The JSON will be written to stdout
    Stats(TidyArgs),
}

#[derive(Args, Debug)]
struct TidyArgs {
    /// Minimum distance in meters between retained samples
    #[clap(long)]
    distance: Option<f64>,

    /// Minimum duration in seconds between retained samples
    #[clap(long)]
    duration: Option<i64>,

    /// JSON file containing the thresholds. Overridden by --distance and --duration
    #[clap(long)]
    thresholds: Option<String>,

    /// JSONL files, each containing a trace of {"lon": .., "lat": .., "timestamp": ..} objects
    jsonl_files: Vec<String>,
}

impl TidyArgs {
    fn thresholds(&self) -> eyre::Result<Thresholds> {
        let thresholds: Thresholds = match self.thresholds.as_ref() {
            Some(filename) => serde_json::from_reader(BufReader::new(File::open(filename)?))?,
            None => Thresholds::default(),
        };
        Ok(thresholds
            .with_overrides(self.distance, self.duration)
            .validate()?)
    }
}

fn main() -> eyre::Result<()> {
    pretty_env_logger::init_timed();
    let args = Cli::parse();

    match &args.command {
        Command::Tidy(tidy_args) => {
            let thresholds = tidy_args.thresholds()?;
            let traces = read_traces(&tidy_args.jsonl_files)?;
            save_geojson(traces, thresholds)?;
        }
        Command::Stats(tidy_args) => {
            let thresholds = tidy_args.thresholds()?;
            let traces = read_traces(&tidy_args.jsonl_files)?;
            print_stats(traces, thresholds)?;
        }
    }
    Ok(())
}

fn read_traces(jsonl_files: &[String]) -> eyre::Result<Vec<Trace>> {
    let mut traces = Vec::with_capacity(jsonl_files.len());

    let mut buf = String::new();
    for jsonl_filename in jsonl_files.iter() {
        let mut points = vec![];
        let mut bufreader = BufReader::new(File::open(jsonl_filename)?);
        loop {
            buf.clear();
            let n_read = bufreader.read_line(&mut buf)?;
            if n_read == 0 {
                // EOF
                break;
            }
            if buf.trim().is_empty() {
                continue;
            }
            let point: TracePoint = match serde_json::from_str(&buf) {
                Ok(point) => point,
                Err(e) => {
                    warn!(
                        "{}: failed to deserialize trace point - {}: {}",
                        jsonl_filename,
                        e,
                        buf.trim_end()
                    );
                    continue;
                }
            };
            points.push(point);
        }

        if !points.is_chronological() {
            warn!("{}: points are not in chronological order", jsonl_filename);
            points.sort_chronologically();
        }
        info!("{}: read {} points", jsonl_filename, points.len());
        traces.push(Trace {
            name: jsonl_filename.clone(),
            points,
        });
    }
    Ok(traces)
}

fn save_geojson(traces: Vec<Trace>, thresholds: Thresholds) -> eyre::Result<()> {
    let mut features = vec![];
    for trace in traces {
        let result = trace.tidy(thresholds);
        for mut feature in tidy_result_features(&trace.coordinates(), &result) {
            feature
                .properties
                .get_or_insert_with(Map::new)
                .insert("trace".to_string(), to_value(&trace.name)?);
            features.push(feature);
        }
    }

    let gj = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    });

    println!("{}", gj);
    Ok(())
}

fn print_stats(traces: Vec<Trace>, thresholds: Thresholds) -> eyre::Result<()> {
    let mut stats = Vec::with_capacity(traces.len());
    for trace in traces {
        let result = trace.tidy(thresholds);
        let summary = TidySummary::new(&trace.coordinates(), &trace.timestamps(), &result);
        info!(
            "{}: {} of {} points retained",
            trace.name, summary.tidied_samples, summary.original_samples
        );
        let summary = to_value(summary)?;
        stats.push(json!({
            "trace": trace.name,
            "summary": summary,
        }));
    }
    println!(
        "{}",
        serde_json::to_string(&json!({
            "thresholds": thresholds,
            "traces": stats,
        }))?
    );
    Ok(())
}
