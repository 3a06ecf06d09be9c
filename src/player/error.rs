use std::fmt;
use thiserror::Error;

/// The five buttons of the transport row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Shuffle,
    Previous,
    PlayPause,
    Next,
    Loop,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transport::Shuffle => "Shuffle",
            Transport::Previous => "Previous",
            Transport::PlayPause => "Play/pause",
            Transport::Next => "Next",
            Transport::Loop => "Loop",
        };
        f.write_str(name)
    }
}

/// Reasons the player view refuses a user request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("No episode is loaded")]
    NoEpisode,
    #[error("{0} is unavailable")]
    Unavailable(Transport),
}
