use anyhow::{Context, Result};
use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::PathBuf;

use zdf::output::{EstimateRecord, OutputFormat, create_formatter};
use zdf::persistence::read_samples;
use zdf::{ChannelKey, FileStore, FilterSpec};

#[derive(Parser, Debug)]
#[command(name = "dump_output")]
#[command(about = "Decode a filter output stream into labelled records", long_about = None)]
struct Args {
    /// Compact filter identifier of the output stream
    #[arg(long, conflicts_with = "config")]
    id: Option<u64>,

    /// TOML filter bank configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the output stream
    #[arg(short, long, default_value = "dat")]
    dir: PathBuf,

    /// Output stream to read instead of the one named after the filter
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Label every value in text output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print only the per-channel summary
    #[arg(short = 's', long)]
    summary_only: bool,
}

#[derive(Debug, Clone, Serialize)]
struct StatsSummary {
    channel: String,
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl StatsSummary {
    fn from_stats(key: ChannelKey, stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            channel: key.to_string(),
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

fn print_summary(summaries: &[StatsSummary], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summaries)?);
        }
        OutputFormat::Csv => {
            println!("channel,count,mean,std_dev,min,max");
            for s in summaries {
                println!(
                    "{},{},{},{},{},{}",
                    s.channel, s.count, s.mean, s.std_dev, s.min, s.max
                );
            }
        }
        OutputFormat::Text => {
            println!();
            println!("=== Channel summary ===");
            for s in summaries {
                println!(
                    "{:<10} n={:<8} mean={:>11.6} std={:>11.6} min={:>11.6} max={:>11.6}",
                    s.channel, s.count, s.mean, s.std_dev, s.min, s.max
                );
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let spec = match (&args.config, args.id) {
        (Some(path), _) => FilterSpec::load(path).context("Failed to load filter config")?,
        (None, Some(id)) => FilterSpec::from_identifier(id).context("Invalid filter identifier")?,
        (None, None) => FilterSpec::default(),
    };
    let path = args
        .input
        .clone()
        .unwrap_or_else(|| FileStore::for_spec(&args.dir, &spec).output_path());

    let samples =
        read_samples(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let keys: Vec<ChannelKey> = spec.channels().collect();
    let width = keys.len();
    if samples.len() % width != 0 {
        log::warn!(
            "Ignoring {} trailing values that do not fill a {}-channel record",
            samples.len() % width,
            width
        );
    }

    let formatter = create_formatter(args.format, args.verbose);
    let mut stats: Vec<Stats<f32>> = (0..width).map(|_| Stats::new()).collect();

    if !args.summary_only
        && let Some(header) = formatter.header(&keys)
    {
        println!("{}", header);
    }

    for (index, values) in samples.chunks_exact(width).enumerate() {
        for (s, &v) in stats.iter_mut().zip(values) {
            s.update(v);
        }
        if !args.summary_only {
            let record = EstimateRecord {
                index,
                keys: &keys,
                values,
            };
            println!("{}", formatter.format(&record));
        }
    }

    let summaries: Vec<StatsSummary> = keys
        .iter()
        .zip(&stats)
        .filter_map(|(&key, s)| StatsSummary::from_stats(key, s))
        .collect();
    if args.summary_only || matches!(args.format, OutputFormat::Text) {
        print_summary(&summaries, args.format)?;
    }

    Ok(())
}
