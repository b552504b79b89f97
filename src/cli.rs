use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Terminal front end for the EazyChoir site.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "eazychoir")]
#[command(about = "Browse the choir schedule, playlist, requests and blog")]
#[command(version)]
pub struct Cli {
    /// Shared link to open, e.g. `https://eazychoir.app/?schedule=schedule-2025-03-02-sis-josephine`
    #[arg(short, long, env = "EAZYCHOIR_LINK")]
    pub link: Option<String>,

    /// Config file (defaults to ~/.eazychoir/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Content database, overriding the config file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command-line values win over the file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.database = Some(db.clone());
        }
    }
}
