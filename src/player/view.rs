use super::error::{PlayerError, Transport};
use super::view_model::{EpisodeCard, PlayerViewModel, SeekSlider, TransportControls};
use crate::episode::Episode;
use crate::events::Subscription;
use crate::media::{MediaController, MediaEvent, MediaNotice, MediaSource};
use crate::session::{PlayerActions, SessionSnapshot};
use crate::time::format_duration;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy)]
pub struct PlayerOptions {
    /// Start playback as soon as a newly selected episode is loaded
    pub autoplay: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self { autoplay: true }
    }
}

/// Anything the player view reacts to
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Session(SessionSnapshot),
    Media(MediaNotice),
}

/// The view's subscriptions to the session and the media element.
/// Dropping this detaches the view from both.
pub struct PlayerEvents {
    session: Subscription<SessionSnapshot>,
    media: Subscription<MediaNotice>,
}

impl PlayerEvents {
    /// Wait for the next notification from either source. Returns `None`
    /// once both sources are gone.
    pub async fn next(&mut self) -> Option<PlayerEvent> {
        tokio::select! {
            Some(snapshot) = self.session.recv() => Some(PlayerEvent::Session(snapshot)),
            Some(notice) = self.media.recv() => Some(PlayerEvent::Media(notice)),
            else => None,
        }
    }

    /// Take whatever is already queued, session changes first
    pub fn drain(&mut self) -> Vec<PlayerEvent> {
        let mut events: Vec<PlayerEvent> = self
            .session
            .drain()
            .into_iter()
            .map(PlayerEvent::Session)
            .collect();
        events.extend(self.media.drain().into_iter().map(PlayerEvent::Media));
        events
    }
}

struct LoadedEpisode {
    selection: u64,
    episode: Episode,
}

/// Player widget state: mirrors the session into the media element and
/// turns user gestures into session actions.
pub struct PlayerView {
    session: Arc<dyn PlayerActions>,
    media: Arc<dyn MediaController>,
    options: PlayerOptions,
    snapshot: SessionSnapshot,
    loaded: Option<LoadedEpisode>,
    /// Bumped on every load; notices stamped with an older value are stale
    generation: u64,
    /// Whole seconds elapsed in the loaded episode
    progress: u64,
    /// Time updates are only tracked once metadata for the current load arrived
    tracking_progress: bool,
    playback_blocked: Option<String>,
}

impl PlayerView {
    /// Create a view bound to `session` and `media`.
    ///
    /// The returned `PlayerEvents` must be pumped into [`PlayerView::handle`]
    /// for the view to follow along.
    pub fn new(
        session: Arc<dyn PlayerActions>,
        media: Arc<dyn MediaController>,
        options: PlayerOptions,
    ) -> (Self, PlayerEvents) {
        // Subscribe before reading the first snapshot so no change slips through
        let events = PlayerEvents {
            session: session.subscribe(),
            media: media.subscribe(),
        };

        let mut view = Self {
            session,
            media,
            options,
            snapshot: SessionSnapshot::default(),
            loaded: None,
            generation: 0,
            progress: 0,
            tracking_progress: false,
            playback_blocked: None,
        };
        let snapshot = view.session.snapshot();
        view.apply_snapshot(snapshot);

        (view, events)
    }

    pub fn handle(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Session(snapshot) => self.apply_snapshot(snapshot),
            PlayerEvent::Media(notice) => self.handle_media_notice(notice),
        }
    }

    /// Handle events until both subscriptions close
    pub async fn run(mut self, mut events: PlayerEvents) -> Self {
        while let Some(event) = events.next().await {
            self.handle(event);
        }
        self
    }

    pub fn progress(&self) -> u64 {
        self.progress
    }

    pub fn episode(&self) -> Option<&Episode> {
        self.loaded.as_ref().map(|loaded| &loaded.episode)
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn playback_blocked(&self) -> Option<&str> {
        self.playback_blocked.as_deref()
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        let previous = std::mem::replace(&mut self.snapshot, snapshot);
        let current = self.snapshot.current_episode().cloned();

        let selection_changed = match (&self.loaded, &current) {
            (Some(loaded), Some(_)) => loaded.selection != self.snapshot.selection,
            (None, None) => false,
            _ => true,
        };

        if selection_changed {
            match current {
                Some(episode) => self.load(episode),
                None => self.unload(),
            }
            return;
        }

        if self.loaded.is_none() {
            return;
        }

        if previous.is_playing != self.snapshot.is_playing {
            self.on_play_state_change(self.snapshot.is_playing);
        }
        if previous.is_looping != self.snapshot.is_looping {
            self.media.set_looping(self.snapshot.is_looping);
        }
    }

    fn load(&mut self, episode: Episode) {
        info!("Loading episode: {} ({})", episode.title, episode.url);

        self.generation += 1;
        self.progress = 0;
        self.tracking_progress = false;
        self.playback_blocked = None;
        self.media.load(&MediaSource {
            url: episode.url.clone(),
            looping: self.snapshot.is_looping,
            expected_duration: episode.duration,
            generation: self.generation,
        });
        self.loaded = Some(LoadedEpisode {
            selection: self.snapshot.selection,
            episode,
        });

        if self.options.autoplay {
            self.media.play();
        } else if self.snapshot.is_playing {
            self.session.set_playing_state(false);
        }
    }

    fn unload(&mut self) {
        info!("No episode selected, unloading media");
        self.loaded = None;
        self.progress = 0;
        self.tracking_progress = false;
        self.playback_blocked = None;
        self.media.unload();
    }

    /// Mirror the session's play intent into the media element
    pub fn on_play_state_change(&mut self, playing: bool) {
        if self.loaded.is_none() {
            return;
        }
        if playing {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    /// Apply a notice from the media element, unless an earlier load caused it
    pub fn handle_media_notice(&mut self, notice: MediaNotice) {
        if notice.generation != self.generation {
            debug!(
                "Ignoring {:?} from load {} (current load {})",
                notice.event, notice.generation, self.generation
            );
            return;
        }
        self.handle_media_event(notice.event);
    }

    /// Apply an event that belongs to the current load
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
            MediaEvent::TimeUpdate { position } => self.on_time_update(position),
            MediaEvent::Played => {
                if self.loaded.is_some() {
                    self.playback_blocked = None;
                    self.session.set_playing_state(true);
                }
            }
            MediaEvent::Paused => {
                if self.loaded.is_some() {
                    self.session.set_playing_state(false);
                }
            }
            MediaEvent::Ended => self.on_ended(),
            MediaEvent::PlayRejected { reason } => self.on_play_rejected(reason),
            MediaEvent::Error { message } => {
                warn!("Media element error: {}", message);
            }
        }
    }

    /// Metadata for the current load is in: restart progress and start
    /// following time updates
    pub fn on_metadata_loaded(&mut self, duration: Option<f64>) {
        let Some(loaded) = &self.loaded else {
            return;
        };
        debug!(
            "Metadata loaded for {}: media reports {:?}s, episode lists {}s",
            loaded.episode.title, duration, loaded.episode.duration
        );
        self.progress = 0;
        self.tracking_progress = true;
    }

    pub fn on_time_update(&mut self, position: f64) {
        if !self.tracking_progress {
            return;
        }
        let Some(loaded) = &self.loaded else {
            return;
        };

        let seconds = if position.is_finite() && position > 0.0 {
            position.floor() as u64
        } else {
            0
        };
        self.progress = seconds.min(loaded.episode.duration);
        trace!("Progress {}", self.progress);
    }

    /// Jump to `amount` seconds. Progress moves immediately, the media
    /// element confirms later through time updates.
    pub fn seek(&mut self, amount: u64) -> Result<(), PlayerError> {
        let loaded = self.loaded.as_ref().ok_or(PlayerError::NoEpisode)?;
        let amount = amount.min(loaded.episode.duration);

        debug!("Seeking to {}s", amount);
        self.media.seek(amount);
        self.progress = amount;
        Ok(())
    }

    pub fn on_ended(&mut self) {
        if self.loaded.is_none() {
            return;
        }

        if self.session.snapshot().has_next {
            info!("Episode ended, advancing");
            self.session.play_next();
        } else {
            info!("Last episode ended, clearing session");
            self.session.clear_player_state();
        }
    }

    fn on_play_rejected(&mut self, reason: String) {
        if self.loaded.is_none() {
            return;
        }
        warn!("Playback did not start: {}", reason);
        self.playback_blocked = Some(reason);
        self.session.set_playing_state(false);
    }

    fn controls(&self) -> TransportControls {
        TransportControls::derive(&self.snapshot)
    }

    fn check(&self, transport: Transport, enabled: bool) -> Result<(), PlayerError> {
        if self.loaded.is_none() {
            debug!("{} ignored: no episode", transport);
            return Err(PlayerError::NoEpisode);
        }
        if !enabled {
            debug!("{} ignored: disabled", transport);
            return Err(PlayerError::Unavailable(transport));
        }
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<(), PlayerError> {
        self.check(Transport::PlayPause, self.controls().play_pause.enabled)?;
        self.session.toggle_play();
        Ok(())
    }

    pub fn toggle_loop(&mut self) -> Result<(), PlayerError> {
        self.check(Transport::Loop, self.controls().looping.enabled)?;
        self.session.toggle_loop();
        Ok(())
    }

    pub fn toggle_shuffle(&mut self) -> Result<(), PlayerError> {
        self.check(Transport::Shuffle, self.controls().shuffle.enabled)?;
        self.session.toggle_shuffle();
        Ok(())
    }

    pub fn play_next(&mut self) -> Result<(), PlayerError> {
        self.check(Transport::Next, self.controls().next.enabled)?;
        self.session.play_next();
        Ok(())
    }

    pub fn play_previous(&mut self) -> Result<(), PlayerError> {
        self.check(Transport::Previous, self.controls().previous.enabled)?;
        self.session.play_previous();
        Ok(())
    }

    pub fn view_model(&self) -> PlayerViewModel {
        let episode = self.episode();
        let duration = episode.map(|episode| episode.duration).unwrap_or(0);

        PlayerViewModel {
            episode: episode.map(EpisodeCard::from),
            progress: self.progress,
            progress_label: format_duration(self.progress),
            duration_label: format_duration(duration),
            slider: match episode {
                Some(_) => SeekSlider::Active {
                    max: duration,
                    value: self.progress,
                },
                None => SeekSlider::Empty,
            },
            controls: self.controls(),
            is_playing: self.snapshot.is_playing,
            playback_blocked: self.playback_blocked.clone(),
        }
    }
}
