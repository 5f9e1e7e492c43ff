//! CLI binary for normalizing raw model output.
//!
//! Usage:
//!   skinsight-normalize response.txt --risk
//!   curl -s .../predict | jq -r '.predictions.choices[0].message.content' \
//!     | skinsight-normalize
//!
//! Reads the model's text from FILE (or stdin when omitted) and prints the
//! normalized result as JSON on stdout.

use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skinsight_analysis::normalize_bytes;

/// Normalize free-form model output into the SkinSight result shape.
#[derive(Parser)]
#[command(name = "skinsight-normalize")]
#[command(version, about, long_about = None)]
struct Cli {
    /// File containing the raw model output (default: stdin)
    input: Option<PathBuf>,

    /// Derive the risk tier from the doctor guidance or explanation
    #[arg(short, long)]
    risk: bool,

    /// Print compact single-line JSON
    #[arg(short, long)]
    compact: bool,
}

fn read_input(input: Option<&PathBuf>) -> std::io::Result<Vec<u8>> {
    match input {
        Some(path) => std::fs::read(path),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = match read_input(cli.input.as_ref()) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: failed to read input: {e}");
            std::process::exit(1);
        }
    };

    let mut result = normalize_bytes(&raw);
    if cli.risk {
        result = result.with_risk();
    }
    if result.is_empty() {
        tracing::warn!(bytes = raw.len(), "no structured data found in input");
    }

    let rendered = if cli.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    };

    match rendered {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}
