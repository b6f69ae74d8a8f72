// ABOUTME: Main application entry point.
// ABOUTME: Parses arguments, sets up logging and session state, then runs the command loop.

mod command;
mod driver;
mod host;
mod outline;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use driver::Driver;
use host::HeadlessHost;
use pw_core::{Config, LayoutSession};
use pw_layout::SplitTree;
use pw_tabs::TabController;

/// Scriptable pane layout and tab composition
#[derive(Parser, Debug)]
#[command(name = "paneweave", version, about)]
struct Args {
    /// Read commands from FILE instead of stdin
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Neither restore nor save the layout session
    #[arg(long)]
    no_session: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    tracing::info!("Starting paneweave");

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(),
    };
    let session_path = if args.no_session {
        None
    } else {
        LayoutSession::default_path()
    };

    let controller = restore_or_fresh(&config, session_path.as_deref());
    let mut driver = Driver::new(controller, session_path);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    driver.show(&mut out)?;

    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            driver.run(BufReader::new(file), &mut out)?;
        }
        None => driver.run(io::stdin().lock(), &mut out)?,
    }

    if config.behavior.save_session_on_exit && !args.no_session {
        if let Err(e) = driver.save_session() {
            tracing::error!("Failed to save session: {:#}", e);
        }
    }

    let host = driver.controller().host();
    tracing::info!(
        "Exiting with {} live surface(s), focus on {:?}",
        host.live().count(),
        host.focused()
    );
    Ok(())
}

fn restore_or_fresh(config: &Config, session_path: Option<&Path>) -> TabController<HeadlessHost> {
    let session = session_path
        .filter(|path| config.behavior.restore_session && path.exists())
        .and_then(|path| match LayoutSession::load(path) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring saved session: {}", e);
                None
            }
        });

    if let Some(session) = session {
        match TabController::restore(&session, HeadlessHost::new(), config.clone()) {
            Ok(controller) => return controller,
            Err(e) => tracing::warn!("Discarding saved session: {}", e),
        }
    }
    TabController::new(SplitTree::new(), HeadlessHost::new(), config.clone())
}
