//! clipvault - clipboard to 1Password
//!
//! Sits in the system tray, listens for a global hotkey, and writes the
//! current clipboard text into a single named secure note in 1Password,
//! creating the note on first save and updating it in place afterwards.

#[cfg(windows)]
mod app;
mod config;
mod models;
mod services;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use services::{clipboard, save_text, Level, Notifier, OpCli, SaveOutcome};

/// clipvault - clipboard to 1Password
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Config file path (default: ~/.config/clipvault/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Secure note title (default: from config)
    #[arg(long)]
    item: Option<String>,

    /// Save the clipboard once and exit instead of running the tray shell
    #[arg(long)]
    once: bool,
}

/// Read the clipboard and save it into the titled secure note.
///
/// Returns true when a save completed.
pub(crate) async fn capture_once(store: &OpCli, title: &str, notifier: &Notifier) -> bool {
    let text = match clipboard::read_text() {
        Ok(text) => text,
        Err(e) => {
            notifier.notify(Level::Error, &format!("Could not read clipboard: {e:#}"));
            return false;
        }
    };

    let Some(text) = clipboard::usable_text(text) else {
        notifier.notify(Level::Warning, "Clipboard is empty");
        return false;
    };

    info!(chars = text.chars().count(), "saving clipboard text");
    match save_text(store, title, &text).await {
        Ok(SaveOutcome::Created) => {
            notifier.notify(
                Level::Info,
                &format!("Clipboard saved to new secure note \"{title}\""),
            );
            true
        }
        Ok(SaveOutcome::Updated) => {
            notifier.notify(Level::Info, "Clipboard saved to 1Password");
            true
        }
        Err(e) => {
            notifier.notify(Level::Error, &format!("Failed to save to 1Password: {e}"));
            false
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let filter = if args.debug {
        "clipvault=debug,info"
    } else {
        "clipvault=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let mut config = if let Some(path) = args.config {
        config::Config::from_file(&path)?
    } else {
        config::Config::load()?
    };

    if let Some(item) = args.item {
        config.onepassword.item_title = item;
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let store = OpCli::new(&config);
    let notifier = Notifier::new(&config);

    // A broken or missing `op` install should fail at startup, not on the
    // first hotkey press.
    runtime
        .block_on(store.preflight())
        .context("1Password CLI is not available; check onepassword.op_path in the config")?;

    if args.once {
        let title = config.onepassword.item_title.clone();
        let saved = runtime.block_on(capture_once(&store, &title, &notifier));
        if !saved {
            std::process::exit(1);
        }
        return Ok(());
    }

    #[cfg(windows)]
    return app::App::new(config, store, notifier, runtime.handle().clone()).run();

    #[cfg(not(windows))]
    anyhow::bail!("the tray shell is only available on Windows; use --once here")
}
