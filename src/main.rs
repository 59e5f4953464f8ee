//! Headless match-3 simulation (default binary).
//!
//! Plays automatically and prints each engine event as a JSON line on
//! stdout. Diagnostics go to stderr through `tracing`; set `RUST_LOG` to
//! see them (default `warn`).
//!
//! ```text
//! match3-sim [--seed N] [--level N] [--turns N] [--profile DIR] [--width W] [--height H]
//! ```

use std::io::{self, BufWriter, Write};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use match3::core::EngineConfig;
use match3::sim::{parse_sim_args, run_sim};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_sim_args(&args, EngineConfig::from_env()?)?;

    let today = chrono::Local::now().date_naive();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = run_sim(&config, today, &mut out)?;
    out.flush()?;

    eprintln!(
        "[sim] turns={} level={} status={} score={} currency={}",
        summary.turns,
        summary.level,
        summary.status.as_str(),
        summary.score,
        summary.currency
    );
    Ok(())
}
