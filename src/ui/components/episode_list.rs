use crate::time::format_duration;
use crate::AppContext;
use dioxus::prelude::*;
use tracing::warn;

use super::player_hooks::{use_session, use_session_state};

/// Episode picker. Choosing an entry hands the whole list to the session so
/// next/previous walk through it.
#[component]
pub fn EpisodeList() -> Element {
    let context = use_context::<AppContext>();
    let session = use_session();
    let session_state = use_session_state();
    let episodes = context.episodes.clone();
    let episodes_path = context.config.episodes_file.display().to_string();

    let current_url = use_memo(move || {
        session_state()
            .current_episode()
            .map(|episode| episode.url.clone())
    });

    rsx! {
        section { class: "episode-list",
            h2 { "Episodes" }
            if episodes.is_empty() {
                p { class: "empty-list", "No episodes found in {episodes_path}" }
            }
            ul {
                for (index, episode) in episodes.iter().enumerate() {
                    li {
                        key: "{episode.url}",
                        class: if current_url().as_deref() == Some(episode.url.as_str()) { "episode is-current" } else { "episode" },
                        img { src: "{episode.thumbnail}", alt: "" }
                        div { class: "episode-details",
                            strong { "{episode.title}" }
                            span { "{episode.members}" }
                        }
                        span { class: "episode-duration", "{format_duration(episode.duration)}" }
                        button {
                            r#type: "button",
                            title: "Play episode",
                            onclick: {
                                let session = session.clone();
                                let episodes = episodes.clone();
                                move |_| {
                                    if let Err(e) = session.play_list(episodes.to_vec(), index) {
                                        warn!("Could not start episode: {}", e);
                                    }
                                }
                            },
                            "▶"
                        }
                    }
                }
            }
        }
    }
}
