use podcastr::config::Config;
use podcastr::episode::load_episodes;
use podcastr::media::SimulatedMedia;
use podcastr::player::{PlayerOptions, PlayerView};
use podcastr::session::SessionHandle;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Wall-clock interval between simulated time updates
const CLOCK_TICK: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [episodes.json]", args[0]);
        eprintln!("Plays the list through a simulated media clock and logs progress.");
        std::process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    config.log_summary();

    let path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.episodes_file.clone());

    let episodes = match load_episodes(&path) {
        Ok(episodes) if !episodes.is_empty() => episodes,
        Ok(_) => {
            error!("{} contains no episodes", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let session = SessionHandle::new();
    let media = SimulatedMedia::new();

    // Nothing can press play here, so always start on load
    let (mut view, mut events) = PlayerView::new(
        Arc::new(session.clone()),
        Arc::new(media.clone()),
        PlayerOptions { autoplay: true },
    );

    if let Err(e) = session.play_list(episodes, 0) {
        error!("Failed to start playlist: {}", e);
        std::process::exit(1);
    }

    let clock = media.spawn_clock(CLOCK_TICK, config.playback_rate);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut started = false;
    let mut last_reported: Option<(String, u64)> = None;

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    break;
                };
                view.handle(event);

                let model = view.view_model();
                match model.episode {
                    Some(episode) => {
                        started = true;
                        let current = (episode.title.clone(), model.progress);
                        if last_reported.as_ref() != Some(&current) {
                            info!(
                                "{} [{} / {}]",
                                episode.title, model.progress_label, model.duration_label
                            );
                            last_reported = Some(current);
                        }
                    }
                    None if started => {
                        info!("Playlist finished");
                        break;
                    }
                    None => {}
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    clock.abort();
}
