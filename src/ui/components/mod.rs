mod episode_list;
mod player_bar;
pub mod player_hooks;

pub use episode_list::EpisodeList;
pub use player_bar::PlayerBar;
pub use player_hooks::{use_session, use_session_state, SessionStateProvider};
