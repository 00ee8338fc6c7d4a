//! Listen Lens - explore a personal streaming-history export.
//!
//! Normalizes heterogeneous export batches (two incompatible schema
//! versions) into one canonical, chronologically ordered dataset and
//! derives cross-filtered views from it: ranked artists, ranked songs,
//! individual listens and day/week listen-count series.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod model;
pub mod store;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("listen_lens=info".parse()?))
        .init();

    cli::run_command(&args)
}
