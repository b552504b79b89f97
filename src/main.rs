//! Binary entry point: read config, open the content database, and drive the
//! terminal host until the user exits.
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use eazychoir::cli::Cli;
use eazychoir::logging;
use eazychoir::share::ShareChain;
use eazychoir::view::Viewport;
use eazychoir::{
    data_dir, default_db_path, ensure_schema, run_app, seed_if_empty, App, Config, ContentStore,
    Location, Router, RouterSettings, TerminalHost,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)?;
    cli.apply_overrides(&mut config);

    logging::init(&data_dir()?, cli.verbose)?;
    info!(config = %config_path.display(), "starting eazychoir");

    let db_path = match &config.database {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };
    let mut conn = ensure_schema(&db_path)?;
    if seed_if_empty(&mut conn)? {
        info!(db = %db_path.display(), "seeded empty content database");
    }
    let store = ContentStore::load(&conn).context("failed to load site content")?;

    let mut settings = RouterSettings::new(config.site_title.clone(), config.share_base()?);
    settings.notification_ttl = config.notification_ttl();
    settings.copy_feedback = config.copy_feedback();

    let location = cli.link.as_deref().and_then(|raw| match Location::parse(raw) {
        Ok(location) => Some(location),
        Err(err) => {
            warn!(error = %err, link = raw, "ignoring unreadable link");
            None
        }
    });

    let router = Router::new(store, settings, Viewport::Desktop);
    let host = TerminalHost::new(ShareChain::from_config(config.share_command.as_deref()));
    let mut app = App::new(router, host, &config);
    run_app(&mut app, location)
}
