//! Tracing setup. The terminal belongs to the UI, so logs go to a file in the
//! data directory instead of stderr.
//!
//! Filter priority: `EAZYCHOIR_LOG`, then `RUST_LOG`, then `debug` with
//! `--verbose` or `info` without.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "eazychoir.log";
const LOG_ENV: &str = "EAZYCHOIR_LOG";

pub fn init(dir: &Path, verbose: bool) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn build_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(default_level(verbose))
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
