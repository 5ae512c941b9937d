use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use zdf::persistence::write_samples;
use zdf::simulation::{SyntheticConfig, generate_synthetic_data};
use zdf::{FileStore, FilterSpec};

#[derive(Parser, Debug)]
#[command(name = "generate_data")]
#[command(about = "Generate synthetic seed and input streams for a filter bank")]
struct Args {
    /// Compact filter identifier naming the generated files
    #[arg(long, conflicts_with = "filter")]
    id: Option<u64>,

    /// TOML filter bank configuration
    #[arg(short, long)]
    filter: Option<PathBuf>,

    /// TOML synthetic data configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "dat")]
    output_dir: PathBuf,

    /// Number of input samples after the seed (CLI override)
    #[arg(short, long)]
    updates: Option<usize>,

    /// Noise standard deviation (CLI override)
    #[arg(long)]
    noise_std: Option<f32>,

    /// Seed for reproducibility (CLI override)
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    synthetic: SyntheticConfig,
}

fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_synthetic_config(args: &Args) -> Result<SyntheticConfig> {
    let mut config = match &args.config {
        Some(path) => load_toml_config(path)?.synthetic,
        None => SyntheticConfig::default(),
    };
    if let Some(updates) = args.updates {
        config.updates = updates;
    }
    if let Some(std_dev) = args.noise_std {
        config.noise.std_dev = std_dev;
    }
    if let Some(seed) = args.seed {
        config.noise.seed = Some(seed);
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let spec = match (&args.filter, args.id) {
        (Some(path), _) => FilterSpec::load(path).context("Failed to load filter config")?,
        (None, Some(id)) => FilterSpec::from_identifier(id).context("Invalid filter identifier")?,
        (None, None) => FilterSpec::default(),
    };
    let config = build_synthetic_config(&args)?;

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let data = generate_synthetic_data(spec.length(), &config);
    let store = FileStore::for_spec(&args.output_dir, &spec);

    write_samples(store.snapshot_path(), &data.seed)
        .with_context(|| format!("Failed to write {}", store.snapshot_path().display()))?;
    write_samples(store.input_path(), &data.input)
        .with_context(|| format!("Failed to write {}", store.input_path().display()))?;

    println!(
        "Generated {} seed and {} input samples for filter {}",
        data.seed.len(),
        data.input.len(),
        spec.identifier()
    );
    println!("  {}", store.snapshot_path().display());
    println!("  {}", store.input_path().display());

    Ok(())
}
