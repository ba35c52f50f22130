use std::{env, fs::File, sync::Arc};

use anyhow::Context;
use data_repl::Repl;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut repl = Repl::new();
    repl.run_fullscreen().context("terminal session failed")
}

/// Send tracing output to the file named by DATA_REPL_LOG, if set. Stderr
/// belongs to the fullscreen terminal, so there is no console fallback.
fn init_logging() -> anyhow::Result<()> {
    let path = match env::var("DATA_REPL_LOG") {
        Ok(path) => path,
        Err(_) => return Ok(()),
    };

    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
