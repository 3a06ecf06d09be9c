use dioxus::desktop::{Config as DioxusConfig, WindowBuilder};
use dioxus::prelude::*;
use tracing::debug;

use crate::ui::components::*;

pub const MAIN_CSS: &str = include_str!("../../assets/main.css");

#[component]
pub fn App() -> Element {
    debug!("Rendering app component");

    rsx! {
        style { "{MAIN_CSS}" }
        SessionStateProvider {
            div { class: "app",
                main { class: "app-content", EpisodeList {} }
                PlayerBar {}
            }
        }
    }
}

pub fn make_config() -> DioxusConfig {
    DioxusConfig::default().with_window(make_window())
}

fn make_window() -> WindowBuilder {
    WindowBuilder::new()
        .with_title("podcastr")
        .with_always_on_top(false)
        .with_inner_size(dioxus::desktop::LogicalSize::new(1100, 720))
}
