pub mod app;
pub mod app_context;
pub mod components;
pub mod web_audio;

pub use app::*;
pub use app_context::AppContext;
pub use components::*;
pub use web_audio::WebAudio;
