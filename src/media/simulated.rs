use super::{MediaController, MediaEvent, MediaNotice, MediaSource};
use crate::events::{Broadcaster, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

#[derive(Default)]
struct SimulatedState {
    source: Option<MediaSource>,
    generation: u64,
    duration: f64,
    position: f64,
    playing: bool,
    looping: bool,
    autoplay_blocked: bool,
}

/// Media element driven by an in-process clock instead of real audio
///
/// Used by the headless runner and by tests. Time only moves when
/// [`SimulatedMedia::advance`] is called, either directly or through
/// [`SimulatedMedia::spawn_clock`].
#[derive(Clone, Default)]
pub struct SimulatedMedia {
    state: Arc<Mutex<SimulatedState>>,
    events: Broadcaster<MediaNotice>,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse play requests, as a browser autoplay policy would
    pub fn set_autoplay_blocked(&self, blocked: bool) {
        self.lock().autoplay_blocked = blocked;
    }

    pub fn position(&self) -> f64 {
        self.lock().position
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    pub fn source(&self) -> Option<MediaSource> {
        self.lock().source.clone()
    }

    /// Move the clock forward by `elapsed` seconds of playback
    pub fn advance(&self, elapsed: f64) {
        let mut state = self.lock();
        if !state.playing || state.source.is_none() {
            return;
        }

        state.position += elapsed;
        if state.position < state.duration {
            trace!("Simulated position {:.2}", state.position);
            self.emit(&state, MediaEvent::TimeUpdate { position: state.position });
            return;
        }

        if state.looping && state.duration > 0.0 {
            let duration = state.duration;
            state.position %= duration;
            debug!("Simulated media looped to {:.2}", state.position);
            self.emit(&state, MediaEvent::TimeUpdate { position: state.position });
            return;
        }

        state.position = state.duration;
        state.playing = false;
        debug!("Simulated media reached the end");
        self.emit(&state, MediaEvent::TimeUpdate { position: state.position });
        self.emit(&state, MediaEvent::Paused);
        self.emit(&state, MediaEvent::Ended);
    }

    /// Advance the clock from a tokio interval. `rate` scales how much
    /// playback time passes per tick. Abort the returned task to stop it.
    pub fn spawn_clock(&self, tick: Duration, rate: f64) -> tokio::task::JoinHandle<()> {
        let media = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                media.advance(tick.as_secs_f64() * rate);
            }
        })
    }

    fn emit(&self, state: &SimulatedState, event: MediaEvent) {
        self.events.publish(MediaNotice {
            generation: state.generation,
            event,
        });
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaController for SimulatedMedia {
    fn load(&self, source: &MediaSource) {
        let mut state = self.lock();
        debug!("Simulated media loading {}", source.url);
        state.source = Some(source.clone());
        state.generation = source.generation;
        state.duration = source.expected_duration as f64;
        state.position = 0.0;
        state.playing = false;
        state.looping = source.looping;
        self.emit(&state, MediaEvent::MetadataLoaded { duration: Some(state.duration) });
    }

    fn unload(&self) {
        let mut state = self.lock();
        state.source = None;
        state.duration = 0.0;
        state.position = 0.0;
        state.playing = false;
    }

    fn play(&self) {
        let mut state = self.lock();
        if state.source.is_none() {
            self.emit(&state, MediaEvent::PlayRejected {
                reason: "no source loaded".to_string(),
            });
            return;
        }
        if state.autoplay_blocked {
            self.emit(&state, MediaEvent::PlayRejected {
                reason: "playback blocked by autoplay policy".to_string(),
            });
            return;
        }
        if state.playing {
            return;
        }

        // Playing a finished element starts over
        if state.position >= state.duration {
            state.position = 0.0;
        }
        state.playing = true;
        self.emit(&state, MediaEvent::Played);
    }

    fn pause(&self) {
        let mut state = self.lock();
        if !state.playing {
            return;
        }
        state.playing = false;
        self.emit(&state, MediaEvent::Paused);
    }

    fn seek(&self, position: u64) {
        let mut state = self.lock();
        if state.source.is_none() {
            return;
        }
        state.position = (position as f64).min(state.duration);
        self.emit(&state, MediaEvent::TimeUpdate { position: state.position });
    }

    fn set_looping(&self, looping: bool) {
        self.lock().looping = looping;
    }

    fn subscribe(&self) -> Subscription<MediaNotice> {
        self.events.subscribe()
    }
}
