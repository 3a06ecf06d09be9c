//! Shared player session: which episode is active and its transport flags.
//!
//! The view never owns this state. It reads snapshots through
//! [`PlayerActions`] and asks for every mutation through the same trait.

mod handle;

pub use handle::{SessionError, SessionHandle};

use crate::episode::Episode;
use crate::events::Subscription;
use std::sync::Arc;

/// Point-in-time copy of the session, published after every change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub episodes: Arc<Vec<Episode>>,
    pub current_index: usize,
    /// Bumped on every (re)selection, including re-selecting the same index
    pub selection: u64,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl SessionSnapshot {
    pub fn current_episode(&self) -> Option<&Episode> {
        self.episodes.get(self.current_index)
    }
}

/// Actions the player view forwards user intent to
pub trait PlayerActions: Send + Sync {
    fn snapshot(&self) -> SessionSnapshot;
    /// Receive a snapshot after every change to the session
    fn subscribe(&self) -> Subscription<SessionSnapshot>;

    fn toggle_play(&self);
    fn toggle_loop(&self);
    fn toggle_shuffle(&self);
    fn set_playing_state(&self, playing: bool);
    fn play_next(&self);
    fn play_previous(&self);
    fn clear_player_state(&self);
}
