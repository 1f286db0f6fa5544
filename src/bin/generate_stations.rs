//! Offline tool: converts the fixed-width station index into the JS lookup
//! table bundled with the web client.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weatherdeck::stations;

#[derive(Parser, Debug)]
#[command(
    name = "generate-stations",
    about = "Converts a fixed-width station index into the client's _StationInfo table"
)]
struct Args {
    /// Fixed-width station index to read.
    #[arg(default_value = "stations.txt")]
    input: PathBuf,

    /// JS lookup table to write.
    #[arg(default_value = "stations.js")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let input = File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mut writer = BufWriter::new(output);
    let count = stations::convert(BufReader::new(input), &mut writer)
        .with_context(|| format!("converting {}", args.input.display()))?;
    writer.flush()?;

    tracing::info!(
        stations = count,
        output = %args.output.display(),
        "station table written"
    );
    Ok(())
}
