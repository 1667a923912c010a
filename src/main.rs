//! Interactive console for the book catalog.

use std::io;

use anyhow::Context;
use book_catalog::{Catalog, Config, Shell};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    init_tracing(&config.log_level);
    if config.no_color {
        colored::control::set_override(false);
    }

    tracing::debug!(data_file = %config.data_file.display(), "starting book catalog");

    let catalog = Catalog::open(&config.data_file)
        .with_context(|| format!("could not open catalog {}", config.data_file.display()))?;

    let stdin = io::stdin();
    let mut shell = Shell::new(catalog, stdin.lock(), io::stdout());
    shell.run().context("catalog session failed")?;

    Ok(())
}

/// Initialize the tracing subscriber, logging to stderr so the menu on
/// stdout stays readable
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
