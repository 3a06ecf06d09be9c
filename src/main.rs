use podcastr::config::Config;
use podcastr::episode::load_episodes;
use podcastr::session::SessionHandle;
use podcastr::ui::{self, AppContext};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting podcastr");
    config.log_summary();

    let episodes = match load_episodes(&config.episodes_file) {
        Ok(episodes) => episodes,
        Err(e) => {
            warn!(
                "No episodes loaded from {}: {}",
                config.episodes_file.display(),
                e
            );
            Vec::new()
        }
    };

    let context = AppContext {
        session: SessionHandle::new(),
        config,
        episodes: Arc::new(episodes),
    };

    dioxus::LaunchBuilder::desktop()
        .with_cfg(ui::make_config())
        .with_context(context)
        .launch(ui::App);
}
