use crate::player::{
    EpisodeCard, PlayerError, PlayerOptions, PlayerView, SeekSlider, TransportControls,
};
use crate::ui::web_audio::{WebAudio, AUDIO_ELEMENT_ID};
use crate::AppContext;
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::debug;

fn log_refused(result: Result<(), PlayerError>) {
    if let Err(e) = result {
        debug!("Player action refused: {}", e);
    }
}

fn toggle_class(active: bool) -> &'static str {
    if active {
        "is-active"
    } else {
        ""
    }
}

#[component]
fn ControlsZone(
    controls: TransportControls,
    is_playing: bool,
    on_shuffle: EventHandler<()>,
    on_previous: EventHandler<()>,
    on_play_pause: EventHandler<()>,
    on_next: EventHandler<()>,
    on_loop: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "buttons",
            button {
                r#type: "button",
                class: toggle_class(controls.shuffle.active),
                title: "Shuffle",
                disabled: !controls.shuffle.enabled,
                onclick: move |_| on_shuffle.call(()),
                "🔀"
            }
            button {
                r#type: "button",
                title: "Play previous",
                disabled: !controls.previous.enabled,
                onclick: move |_| on_previous.call(()),
                "⏮"
            }
            button {
                r#type: "button",
                class: "play-button",
                title: if is_playing { "Pause" } else { "Play" },
                disabled: !controls.play_pause.enabled,
                onclick: move |_| on_play_pause.call(()),
                if is_playing {
                    "⏸"
                } else {
                    "▶"
                }
            }
            button {
                r#type: "button",
                title: "Play next",
                disabled: !controls.next.enabled,
                onclick: move |_| on_next.call(()),
                "⏭"
            }
            button {
                r#type: "button",
                class: toggle_class(controls.looping.active),
                title: "Repeat",
                disabled: !controls.looping.enabled,
                onclick: move |_| on_loop.call(()),
                "🔁"
            }
        }
    }
}

#[component]
fn EpisodeZone(episode: Option<EpisodeCard>) -> Element {
    rsx! {
        if let Some(episode) = episode {
            div { class: "current-episode",
                img { src: "{episode.thumbnail}", alt: "" }
                strong { "{episode.title}" }
                span { "{episode.members}" }
            }
        } else {
            div { class: "empty-player",
                strong { "Select a podcast to listen to" }
            }
        }
    }
}

#[component]
fn ProgressZone(
    progress_label: String,
    duration_label: String,
    slider: SeekSlider,
    on_seek: EventHandler<u64>,
) -> Element {
    rsx! {
        div { class: "progress",
            span { "{progress_label}" }
            div { class: "slider",
                if let SeekSlider::Active { max, value } = slider {
                    input {
                        r#type: "range",
                        min: "0",
                        max: "{max}",
                        value: "{value}",
                        oninput: move |evt| {
                            if let Ok(secs) = evt.value().parse::<u64>() {
                                on_seek.call(secs);
                            }
                        },
                    }
                } else {
                    div { class: "empty-slider" }
                }
            }
            span { "{duration_label}" }
        }
    }
}

#[component]
pub fn PlayerBar() -> Element {
    let context = use_context::<AppContext>();

    // Built once per mount; the pump task (and with it the view's
    // subscriptions) is dropped when the bar unmounts
    let (mut view, media) = use_hook(move || {
        let media = WebAudio::new();
        let options = PlayerOptions {
            autoplay: context.config.autoplay,
        };
        let (player_view, mut events) = PlayerView::new(
            Arc::new(context.session.clone()),
            Arc::new(media.clone()),
            options,
        );
        let mut view = Signal::new(player_view);

        spawn(async move {
            while let Some(event) = events.next().await {
                view.write().handle(event);
            }
        });

        (view, media)
    });

    let model = view.read().view_model();
    let footer_class = if model.episode.is_some() { "" } else { "empty" };

    rsx! {
        div { class: "player-container",
            header {
                span { class: "player-header-icon", "🎧" }
                strong { "Now playing" }
            }
            EpisodeZone { episode: model.episode.clone() }
            footer { class: footer_class,
                ProgressZone {
                    progress_label: model.progress_label.clone(),
                    duration_label: model.duration_label.clone(),
                    slider: model.slider,
                    on_seek: move |secs| log_refused(view.write().seek(secs)),
                }
                audio {
                    id: AUDIO_ELEMENT_ID,
                    preload: "metadata",
                    onmounted: move |_| {
                        let media = media.clone();
                        spawn(async move {
                            media.run_bridge().await;
                        });
                    },
                }
                if let Some(reason) = model.playback_blocked.clone() {
                    div { class: "playback-blocked", title: "{reason}",
                        "Playback was blocked. Press play to start listening."
                    }
                }
                ControlsZone {
                    controls: model.controls,
                    is_playing: model.is_playing,
                    on_shuffle: move |_| log_refused(view.write().toggle_shuffle()),
                    on_previous: move |_| log_refused(view.write().play_previous()),
                    on_play_pause: move |_| log_refused(view.write().toggle_play()),
                    on_next: move |_| log_refused(view.write().play_next()),
                    on_loop: move |_| log_refused(view.write().toggle_loop()),
                }
            }
        }
    }
}
