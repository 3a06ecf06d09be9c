mod error;
mod view;
pub mod view_model;

pub use error::{PlayerError, Transport};
pub use view::{PlayerEvent, PlayerEvents, PlayerOptions, PlayerView};
pub use view_model::{ButtonState, EpisodeCard, PlayerViewModel, SeekSlider, TransportControls};
