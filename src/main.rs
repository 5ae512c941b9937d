use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use zdf::config::derivative_mask;
use zdf::signal_processing::required_length;
use zdf::{FileStore, FilterBank, FilterSpec, LengthQuery, ZdfProcessor};

#[derive(Parser, Debug)]
#[command(name = "zdf")]
#[command(about = "Minimal-delay derivative estimation over flat f32 streams", long_about = None)]
struct Args {
    /// Directory holding the .zdft/.zdfi/.zdfo streams
    #[arg(short = 'd', long, default_value = "dat")]
    dir: PathBuf,

    /// TOML file describing the filter bank
    #[arg(short = 'c', long, conflicts_with = "id")]
    config: Option<PathBuf>,

    /// Compact filter identifier (as used in stream file names)
    #[arg(long)]
    id: Option<u64>,

    /// Print the output delay in samples and exit
    #[arg(long)]
    delay: bool,

    /// Print the minimum filter length for SNR,SIMILARITY and exit
    #[arg(long, value_name = "SNR,SIMILARITY")]
    min_length: Option<LengthQuery>,

    /// Print the compact identifier and exit
    #[arg(long)]
    encode: bool,

    /// Print the bit mask of a comma-separated derivative list and exit
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    derivative_mask: Option<Vec<u8>>,

    /// Write a snapshot of the history after processing
    #[arg(short = 'w', long)]
    write: bool,
}

fn load_spec(args: &Args) -> anyhow::Result<FilterSpec> {
    if let Some(path) = &args.config {
        return FilterSpec::load(path)
            .with_context(|| format!("Failed to load filter config {}", path.display()));
    }
    if let Some(id) = args.id {
        return FilterSpec::from_identifier(id)
            .with_context(|| format!("Invalid filter identifier {}", id));
    }
    Ok(FilterSpec::default())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    if let Some(query) = args.min_length {
        let length = required_length(query.snr, query.similarity)
            .context("Invalid minimum length query")?;
        println!("{}", length);
        return Ok(());
    }

    if let Some(derivatives) = &args.derivative_mask {
        let mask = derivative_mask(derivatives).context("Invalid derivative list")?;
        println!("{}", mask);
        return Ok(());
    }

    let spec = load_spec(&args)?;

    if args.encode {
        println!("{}", spec.identifier());
        return Ok(());
    }

    let bank = FilterBank::build(&spec).context("Failed to build filter bank")?;

    if args.delay {
        println!("{}", bank.k_delay());
        return Ok(());
    }

    let store = FileStore::for_spec(&args.dir, &spec);
    let input = store.input_path();
    let mut processor = ZdfProcessor::with_bank(bank.into(), store).with_context(|| {
        format!(
            "Failed to seed filter {} from {}",
            spec.identifier(),
            args.dir.display()
        )
    })?;

    processor
        .run()
        .with_context(|| format!("Failed to process {}", input.display()))?;

    if args.write {
        processor.checkpoint().context("Failed to write snapshot")?;
    }

    Ok(())
}
