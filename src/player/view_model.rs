use crate::episode::Episode;
use crate::session::SessionSnapshot;

/// Metadata shown for the current episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeCard {
    pub title: String,
    pub members: String,
    pub thumbnail: String,
}

impl From<&Episode> for EpisodeCard {
    fn from(episode: &Episode) -> Self {
        Self {
            title: episode.title.clone(),
            members: episode.members.clone(),
            thumbnail: episode.thumbnail.clone(),
        }
    }
}

/// Seek control. Ranges over `[0, max]` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekSlider {
    Empty,
    Active { max: u64, value: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub enabled: bool,
    /// Highlighted, for the shuffle and loop toggles
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportControls {
    pub shuffle: ButtonState,
    pub previous: ButtonState,
    pub play_pause: ButtonState,
    pub next: ButtonState,
    pub looping: ButtonState,
}

impl TransportControls {
    pub fn derive(snapshot: &SessionSnapshot) -> Self {
        let has_episode = snapshot.current_episode().is_some();

        Self {
            shuffle: ButtonState {
                enabled: has_episode && snapshot.episodes.len() > 1,
                active: snapshot.is_shuffling,
            },
            previous: ButtonState {
                enabled: has_episode && snapshot.has_previous,
                active: false,
            },
            play_pause: ButtonState {
                enabled: has_episode,
                active: snapshot.is_playing,
            },
            next: ButtonState {
                enabled: has_episode && snapshot.has_next,
                active: false,
            },
            looping: ButtonState {
                enabled: has_episode,
                active: snapshot.is_looping,
            },
        }
    }
}

/// Everything the player bar needs to render
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerViewModel {
    pub episode: Option<EpisodeCard>,
    pub progress: u64,
    pub progress_label: String,
    pub duration_label: String,
    pub slider: SeekSlider,
    pub controls: TransportControls,
    pub is_playing: bool,
    /// Set when the media element refused to start; holds the reason
    pub playback_blocked: Option<String>,
}
