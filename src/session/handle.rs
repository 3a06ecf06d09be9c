use super::{PlayerActions, SessionSnapshot};
use crate::episode::Episode;
use crate::events::{Broadcaster, Subscription};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Episode index {index} out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

struct SessionState {
    episodes: Arc<Vec<Episode>>,
    current_index: usize,
    selection: u64,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
    rng: StdRng,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        let len = self.episodes.len();
        SessionSnapshot {
            episodes: self.episodes.clone(),
            current_index: self.current_index,
            selection: self.selection,
            is_playing: self.is_playing,
            is_looping: self.is_looping,
            is_shuffling: self.is_shuffling,
            has_next: len > 0 && (self.is_shuffling || self.current_index + 1 < len),
            has_previous: len > 0 && self.current_index > 0,
        }
    }

    fn select(&mut self, index: usize) {
        self.current_index = index;
        self.selection += 1;
    }
}

/// Handle to the player session. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<Mutex<SessionState>>,
    changes: Broadcaster<SessionSnapshot>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a session whose shuffle order comes from `rng`
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                episodes: Arc::new(Vec::new()),
                current_index: 0,
                selection: 0,
                is_playing: false,
                is_looping: false,
                is_shuffling: false,
                rng,
            })),
            changes: Broadcaster::new(),
        }
    }

    /// Replace the session with a single episode and start playing it
    pub fn play(&self, episode: Episode) {
        info!("Playing episode: {}", episode.title);
        self.update("play", |state| {
            state.episodes = Arc::new(vec![episode]);
            state.select(0);
            state.is_playing = true;
        });
    }

    /// Replace the session with `episodes` and start playing the one at `index`
    pub fn play_list(&self, episodes: Vec<Episode>, index: usize) -> Result<(), SessionError> {
        if index >= episodes.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: episodes.len(),
            });
        }

        info!(
            "Playing list of {} episodes from index {}: {}",
            episodes.len(),
            index,
            episodes[index].title
        );
        self.update("play_list", |state| {
            state.episodes = Arc::new(episodes);
            state.select(index);
            state.is_playing = true;
        });
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `change` and notify subscribers if the snapshot differs.
    /// Publishing happens under the lock so subscribers see changes in order.
    fn update(&self, action: &str, change: impl FnOnce(&mut SessionState)) {
        let mut state = self.lock();
        let before = state.snapshot();
        change(&mut *state);
        let after = state.snapshot();

        if after == before {
            debug!("Session {}: no change", action);
            return;
        }

        debug!(
            "Session {}: index={} selection={} playing={} looping={} shuffling={}",
            action,
            after.current_index,
            after.selection,
            after.is_playing,
            after.is_looping,
            after.is_shuffling
        );
        self.changes.publish(after);
    }
}

impl PlayerActions for SessionHandle {
    fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    fn subscribe(&self) -> Subscription<SessionSnapshot> {
        self.changes.subscribe()
    }

    fn toggle_play(&self) {
        self.update("toggle_play", |state| state.is_playing = !state.is_playing);
    }

    fn toggle_loop(&self) {
        self.update("toggle_loop", |state| state.is_looping = !state.is_looping);
    }

    fn toggle_shuffle(&self) {
        self.update("toggle_shuffle", |state| {
            state.is_shuffling = !state.is_shuffling
        });
    }

    fn set_playing_state(&self, playing: bool) {
        self.update("set_playing_state", |state| state.is_playing = playing);
    }

    fn play_next(&self) {
        self.update("play_next", |state| {
            let len = state.episodes.len();
            if len == 0 {
                return;
            }

            if state.is_shuffling {
                let index = state.rng.gen_range(0..len);
                state.select(index);
            } else if state.current_index + 1 < len {
                let index = state.current_index + 1;
                state.select(index);
            }
        });
    }

    fn play_previous(&self) {
        self.update("play_previous", |state| {
            if !state.episodes.is_empty() && state.current_index > 0 {
                let index = state.current_index - 1;
                state.select(index);
            }
        });
    }

    fn clear_player_state(&self) {
        info!("Clearing player session");
        self.update("clear_player_state", |state| {
            state.episodes = Arc::new(Vec::new());
            state.current_index = 0;
            state.is_playing = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(n: u64) -> Episode {
        Episode {
            title: format!("Episode {}", n),
            members: "Host".to_string(),
            thumbnail: format!("https://example.com/{}.jpg", n),
            duration: 60 * n,
            url: format!("https://example.com/{}.mp3", n),
        }
    }

    fn session_with(count: u64, index: usize) -> SessionHandle {
        let session = SessionHandle::with_rng(StdRng::seed_from_u64(7));
        session
            .play_list((1..=count).map(episode).collect(), index)
            .unwrap();
        session
    }

    #[test]
    fn test_empty_session() {
        let snapshot = SessionHandle::new().snapshot();
        assert!(snapshot.current_episode().is_none());
        assert!(!snapshot.has_next);
        assert!(!snapshot.has_previous);
        assert!(!snapshot.is_playing);
    }

    #[test]
    fn test_play_replaces_list_and_starts_playing() {
        let session = session_with(3, 2);
        session.play(episode(9));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.episodes.len(), 1);
        assert_eq!(snapshot.current_episode(), Some(&episode(9)));
        assert!(snapshot.is_playing);
        assert!(!snapshot.has_next);
        assert!(!snapshot.has_previous);
    }

    #[test]
    fn test_play_list_rejects_bad_index() {
        let session = SessionHandle::new();
        let err = session.play_list(vec![episode(1)], 1).unwrap_err();
        assert_eq!(err, SessionError::IndexOutOfRange { index: 1, len: 1 });
        assert!(session.snapshot().current_episode().is_none());
    }

    #[test]
    fn test_next_and_previous_follow_list_position() {
        let session = session_with(3, 0);
        let snapshot = session.snapshot();
        assert!(snapshot.has_next);
        assert!(!snapshot.has_previous);

        session.play_next();
        session.play_next();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.current_index, 2);
        assert!(!snapshot.has_next);
        assert!(snapshot.has_previous);

        // At the end of the list nothing changes
        session.play_next();
        assert_eq!(session.snapshot().current_index, 2);

        session.play_previous();
        assert_eq!(session.snapshot().current_index, 1);
    }

    #[test]
    fn test_shuffle_always_has_next() {
        let session = session_with(4, 3);
        assert!(!session.snapshot().has_next);

        session.toggle_shuffle();
        assert!(session.snapshot().has_next);

        let before = session.snapshot().selection;
        session.play_next();
        let snapshot = session.snapshot();
        assert!(snapshot.current_index < 4);
        assert_eq!(snapshot.selection, before + 1);
    }

    #[test]
    fn test_clear_player_state() {
        let session = session_with(2, 1);
        session.clear_player_state();

        let snapshot = session.snapshot();
        assert!(snapshot.current_episode().is_none());
        assert_eq!(snapshot.current_index, 0);
        assert!(!snapshot.is_playing);
        assert!(!snapshot.has_next);
        assert!(!snapshot.has_previous);
    }

    #[test]
    fn test_notifies_only_on_change() {
        let session = session_with(2, 0);
        let mut changes = session.subscribe();

        session.set_playing_state(true);
        session.play_previous();
        assert!(changes.drain().is_empty());

        session.toggle_loop();
        session.set_playing_state(false);
        let published = changes.drain();
        assert_eq!(published.len(), 2);
        assert!(published[0].is_looping);
        assert!(!published[1].is_playing);
    }
}
