mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod viewer;
mod widgets;

use std::sync::Arc;

use zone_proto::access::{AccessGate, SystemClock};
use zone_proto::catalog::HttpCatalogSource;
use zone_proto::config::Config;
use zone_proto::controller::Controller;
use zone_proto::platform;
use zone_proto::store::{FileStore, KeyValueStore, MemoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but keep
    // connection-level chatter from the HTTP stack out of the log.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("zonedeck log: {}", log_path.display());
    tracing::info!("zonedeck starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("config unreadable, using defaults: {}", e);
            Config::default()
        }
    };

    // ── Stores ───────────────────────────────────────────────────────────────
    let session: Box<dyn KeyValueStore> = if config.access.remember_unlock {
        session_store()
    } else {
        Box::new(MemoryStore::new())
    };
    let prefs = FileStore::open(platform::preferences_file());
    let (theme, cloak) = app::load_prefs(&prefs);

    // ── Controller ───────────────────────────────────────────────────────────
    let gate = AccessGate::open(Box::new(SystemClock), session);
    let controller = Controller::new(gate);

    // ── Catalog source ───────────────────────────────────────────────────────
    let source = Arc::new(HttpCatalogSource::new(config.catalog.clone())?);

    // ── Frame host ───────────────────────────────────────────────────────────
    let frame_host =
        viewer::FrameHost::start(&config.viewer.bind_address, config.viewer.port).await?;

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let mut state = app_state::AppState::new(controller, theme, cloak);
    state.config_path = Config::config_path();
    state.log_path = log_path;

    let app = app::App::new(
        state,
        source,
        frame_host,
        Box::new(prefs),
        config.viewer.launch_browser,
    );
    app.run().await?;

    Ok(())
}

/// File-backed session store in a directory only this user can read. Falls
/// back to memory when that directory cannot be secured.
fn session_store() -> Box<dyn KeyValueStore> {
    let path = platform::session_file();
    let private = path
        .parent()
        .map(platform::ensure_private_dir)
        .unwrap_or(Ok(()));
    match private {
        Ok(()) => Box::new(FileStore::open(path)),
        Err(e) => {
            tracing::warn!("session dir unusable, unlock lasts for this run only: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}
