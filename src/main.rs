mod app;
mod cache;
mod config;
mod error;
mod stats;
mod store;
mod todo;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cache::CachedStore;
use crate::config::{BackendKind, Config};
use crate::error::Result;
use crate::store::StoreAdapter;

#[derive(Parser, Debug)]
#[command(name = "tido")]
#[command(about = "Terminal todo list backed by Google Sheets or Firestore")]
#[command(version)]
struct Args {
    /// Path to config file (default: ./tido.yaml, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backing store, overriding the config file
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,
}

/// Log to a file in the cache dir; stdout belongs to the terminal UI.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dirs = directories::ProjectDirs::from("", "", "tido")?;
    std::fs::create_dir_all(dirs.cache_dir()).ok()?;

    let appender = tracing_appender::rolling::never(dirs.cache_dir(), "tido.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }

    // The store handle is built once and reused for the process lifetime.
    let store = config.build_store()?;
    let adapter = StoreAdapter::new(store);
    let mut app = App::new(CachedStore::new(adapter, config.cache_ttl()));

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();
    result
}
