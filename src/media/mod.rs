//! Media element abstraction.
//!
//! The player view talks to whatever actually produces sound only through
//! [`MediaController`], and learns what happened through [`MediaNotice`]s.
//! Each notice names the load it came from, so events that outlive a source
//! change can be dropped.

mod simulated;

pub use simulated::SimulatedMedia;

use crate::events::Subscription;

/// What to load into the media element
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub url: String,
    pub looping: bool,
    /// Duration advertised by the episode list, in seconds
    pub expected_duration: u64,
    /// Stamp for this load. Events caused by it carry the same value.
    pub generation: u64,
}

/// Notifications coming back from the media element
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration and seekability are known. `None` for unbounded streams.
    MetadataLoaded {
        duration: Option<f64>,
    },
    TimeUpdate {
        position: f64,
    },
    Played,
    Paused,
    Ended,
    /// A play request was refused, e.g. by an autoplay policy
    PlayRejected {
        reason: String,
    },
    Error {
        message: String,
    },
}

/// A media event tagged with the load it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct MediaNotice {
    pub generation: u64,
    pub event: MediaEvent,
}

/// Imperative handle on a media element
///
/// Commands are fire-and-forget. Their outcome, including failures, is
/// reported asynchronously through the event subscription.
pub trait MediaController: Send + Sync {
    fn load(&self, source: &MediaSource);
    fn unload(&self);
    fn play(&self);
    fn pause(&self);
    /// Jump to `position` seconds
    fn seek(&self, position: u64);
    fn set_looping(&self, looping: bool);
    fn subscribe(&self) -> Subscription<MediaNotice>;
}
